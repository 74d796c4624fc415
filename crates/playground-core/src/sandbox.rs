/// Explicit capability set granted to the rendering surface.
///
/// The grant is configuration chosen at surface construction, not a fixed
/// constant: callers trade isolation for compatibility with interactive
/// demos. Read access to the host's storage, navigation, and top-level
/// browsing context stays denied unless `FullInteractive` is chosen for a
/// deliberate final-result view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityGrant {
    /// Script execution only; the default for the live preview.
    ScriptsOnly,
    /// Scripts plus form submission.
    ScriptsAndForms,
    /// Scripts, forms, popups, modals, and same-origin access. Reserved for
    /// the full-screen final-result view.
    FullInteractive,
}

impl CapabilityGrant {
    /// The individual capability tokens, in the sandbox vocabulary of the
    /// embedded document host.
    #[must_use]
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            CapabilityGrant::ScriptsOnly => &["allow-scripts"],
            CapabilityGrant::ScriptsAndForms => &["allow-scripts", "allow-forms"],
            CapabilityGrant::FullInteractive => &[
                "allow-scripts",
                "allow-forms",
                "allow-popups",
                "allow-modals",
                "allow-same-origin",
            ],
        }
    }

    /// Space-joined token list, the form the host surface consumes.
    #[must_use]
    pub fn attribute(&self) -> String {
        self.tokens().join(" ")
    }

    #[inline]
    #[must_use]
    pub fn allows_same_origin(&self) -> bool {
        matches!(self, CapabilityGrant::FullInteractive)
    }
}

/// The seam to the actual display surface (an embedded document view in the
/// UI crate, a recording fake in tests).
///
/// `replace_content` swaps the entire hosted document. Script failures
/// inside the host are the host's problem; nothing propagates back here.
pub trait RenderHost {
    fn replace_content(&mut self, document: &str);
}

/// Hosts the assembled document in an isolated context and re-renders by
/// replacing its entire content, never by patching in place, so script
/// state from one version cannot persist into the next.
pub struct SandboxedRenderer<H: RenderHost> {
    host: H,
    grant: CapabilityGrant,

    /// Counts full-content replacements; each render is a fresh execution
    /// context.
    generation: u64,
}

impl<H: RenderHost> SandboxedRenderer<H> {
    pub fn new(host: H, grant: CapabilityGrant) -> Self {
        Self {
            host,
            grant,
            generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn grant(&self) -> CapabilityGrant {
        self.grant
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the hosted document wholesale.
    pub fn render(&mut self, document: &str) {
        self.generation += 1;
        self.host.replace_content(document);
    }

    /// Renders a committed snapshot; the run action's path.
    pub fn render_snapshot(
        &mut self,
        snapshot: &crate::buffer::CommittedSnapshot,
        mode: crate::buffer::RenderMode,
        flavor: crate::assemble::DocumentFlavor,
    ) {
        let document = crate::assemble::assemble_snapshot(snapshot, mode, flavor);
        self.render(&document);
    }

    /// Live mirroring for markup-only mode: the markup buffer passes
    /// through verbatim on every edit, without a run action.
    pub fn render_live_markup(&mut self, markup: &str) {
        self.generation += 1;
        self.host.replace_content(markup);
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DocumentFlavor;
    use crate::buffer::RenderMode;

    /// Records every full-content replacement it receives.
    struct RecordingHost {
        documents: Vec<String>,
    }

    impl RenderHost for RecordingHost {
        fn replace_content(&mut self, document: &str) {
            self.documents.push(document.to_string());
        }
    }

    fn renderer(grant: CapabilityGrant) -> SandboxedRenderer<RecordingHost> {
        SandboxedRenderer::new(
            RecordingHost {
                documents: Vec::new(),
            },
            grant,
        )
    }

    #[test]
    fn test_grant_token_lists() {
        assert_eq!(CapabilityGrant::ScriptsOnly.attribute(), "allow-scripts");
        assert_eq!(
            CapabilityGrant::ScriptsAndForms.attribute(),
            "allow-scripts allow-forms"
        );
        assert_eq!(
            CapabilityGrant::FullInteractive.attribute(),
            "allow-scripts allow-forms allow-popups allow-modals allow-same-origin"
        );

        assert!(!CapabilityGrant::ScriptsOnly.allows_same_origin());
        assert!(!CapabilityGrant::ScriptsAndForms.allows_same_origin());
        assert!(CapabilityGrant::FullInteractive.allows_same_origin());
    }

    #[test]
    fn test_every_render_replaces_the_whole_document() {
        let mut renderer = renderer(CapabilityGrant::ScriptsOnly);

        renderer.render("<p>one</p>");
        renderer.render("<p>two</p>");

        assert_eq!(renderer.generation(), 2);
        assert_eq!(
            renderer.host_mut().documents,
            vec!["<p>one</p>".to_string(), "<p>two</p>".to_string()]
        );
    }

    #[test]
    fn test_snapshot_render_assembles_per_mode() {
        let mut store = crate::buffer::BufferStore::with_contents("<p>hi</p>", "p{}", "1");
        let snapshot = store.commit();
        let mut renderer = renderer(CapabilityGrant::ScriptsOnly);

        renderer.render_snapshot(&snapshot, RenderMode::MarkupOnly, DocumentFlavor::Preview);
        assert_eq!(renderer.host_mut().documents.last().unwrap(), "<p>hi</p>");

        renderer.render_snapshot(&snapshot, RenderMode::Full, DocumentFlavor::Preview);
        let full = renderer.host_mut().documents.last().unwrap().clone();
        assert!(full.starts_with("<!DOCTYPE html>"));
        assert!(full.contains("<p>hi</p>"));
    }

    #[test]
    fn test_live_markup_mirroring_is_verbatim() {
        let mut renderer = renderer(CapabilityGrant::ScriptsOnly);

        renderer.render_live_markup("<h1>draft");
        assert_eq!(renderer.host_mut().documents, vec!["<h1>draft".to_string()]);
    }
}
