/// Which surface the assembled document is destined for. The preview pane
/// and the full-result view share one assembly routine but differ in title
/// and link behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFlavor {
    /// The side-by-side preview pane.
    Preview,
    /// The standalone full-result view; links open outside the sandbox.
    FinalResult,
}

/// Default presentation layer embedded ahead of the user's stylesheet in
/// full mode.
const BASELINE_STYLE: &str = "    :root {
      --primary-bg: #f8f9fc;
      --primary-text: #1a1f2c;
      --accent-blue: #33C3F0;
    }
    body {
      margin: 0;
      padding: 1rem;
      font-family: system-ui, -apple-system, sans-serif;
      background: var(--primary-bg);
      color: var(--primary-text);
    }
    a {
      color: var(--accent-blue);
      text-decoration: none;
    }
    a:hover {
      text-decoration: underline;
    }
    button {
      cursor: pointer;
    }";

/// Assembles the preview document from the three buffer texts.
///
/// `MarkupOnly` returns the markup verbatim, unmodified. `Full` composes a
/// single self-contained document: baseline presentation layer, then the
/// style buffer inlined as a style block, then the markup as body content,
/// then the script buffer as an executable block after the body.
///
/// Pure string composition. Nothing is parsed or validated; malformed
/// input passes through unchanged and any resulting failure is contained
/// by the sandboxed renderer, not here.
#[must_use]
pub fn assemble(
    markup: &str,
    style: &str,
    script: &str,
    mode: crate::buffer::RenderMode,
) -> String {
    assemble_flavor(markup, style, script, mode, DocumentFlavor::Preview)
}

#[must_use]
pub fn assemble_flavor(
    markup: &str,
    style: &str,
    script: &str,
    mode: crate::buffer::RenderMode,
    flavor: DocumentFlavor,
) -> String {
    if mode == crate::buffer::RenderMode::MarkupOnly {
        return markup.to_string();
    }

    let (title, base) = match flavor {
        DocumentFlavor::Preview => ("HTML Preview", ""),
        DocumentFlavor::FinalResult => ("Result", "  <base target=\"_blank\">\n"),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20 <meta charset=\"UTF-8\">\n\
         \x20 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         {base}\
         \x20 <title>{title}</title>\n\
         \x20 <style>\n\
         {BASELINE_STYLE}\n\
         {style}\n\
         \x20 </style>\n\
         </head>\n\
         <body>\n\
         {markup}\n\
         <script>\n\
         {script}\n\
         </script>\n\
         </body>\n\
         </html>"
    )
}

/// Assembles from a committed snapshot; the run action's render path.
#[must_use]
pub fn assemble_snapshot(
    snapshot: &crate::buffer::CommittedSnapshot,
    mode: crate::buffer::RenderMode,
    flavor: DocumentFlavor,
) -> String {
    assemble_flavor(
        snapshot.markup(),
        snapshot.style(),
        snapshot.script(),
        mode,
        flavor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RenderMode;

    #[test]
    fn test_markup_only_is_verbatim() {
        let markup = "<p>unclosed\n<div>";
        let out = assemble(markup, "p{color:red}", "console.log(1)", RenderMode::MarkupOnly);

        // Style and script buffers are ignored entirely.
        assert_eq!(out, markup);
    }

    #[test]
    fn test_full_mode_orders_style_markup_script() {
        let out = assemble(
            "<p>hi</p>",
            "p{color:red}",
            "console.log(1)",
            RenderMode::Full,
        );

        let style_at = out.find("p{color:red}").expect("style fragment present");
        let markup_at = out.find("<p>hi</p>").expect("markup fragment present");
        let script_at = out.find("console.log(1)").expect("script fragment present");

        assert!(style_at < markup_at);
        assert!(markup_at < script_at);
    }

    #[test]
    fn test_full_mode_embeds_baseline_before_user_style() {
        let out = assemble("<p>hi</p>", "p{color:red}", "", RenderMode::Full);

        let baseline_at = out.find("--primary-bg").expect("baseline present");
        let user_at = out.find("p{color:red}").unwrap();
        assert!(baseline_at < user_at);
    }

    #[test]
    fn test_malformed_input_passes_through_unchanged() {
        let out = assemble(
            "<div><span>",
            "p { color: }",
            "function ( {",
            RenderMode::Full,
        );

        assert!(out.contains("<div><span>"));
        assert!(out.contains("p { color: }"));
        assert!(out.contains("function ( {"));
    }

    #[test]
    fn test_flavors_differ_in_title_and_base_target() {
        let preview = assemble_flavor("", "", "", RenderMode::Full, DocumentFlavor::Preview);
        let final_result =
            assemble_flavor("", "", "", RenderMode::Full, DocumentFlavor::FinalResult);

        assert!(preview.contains("<title>HTML Preview</title>"));
        assert!(!preview.contains("<base"));

        assert!(final_result.contains("<title>Result</title>"));
        assert!(final_result.contains("<base target=\"_blank\">"));
    }

    #[test]
    fn test_snapshot_assembly_matches_field_assembly() {
        let mut store = crate::buffer::BufferStore::with_contents("<b>x</b>", "b{}", "1+1");
        let snapshot = store.commit();

        assert_eq!(
            assemble_snapshot(&snapshot, RenderMode::Full, DocumentFlavor::Preview),
            assemble("<b>x</b>", "b{}", "1+1", RenderMode::Full),
        );
    }
}
