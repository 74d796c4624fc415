/// The closed set of language slots a playground session edits.
/// Every buffer, surface binding, and bus command is keyed by one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    /// HTML body content.
    Markup,
    /// CSS inlined into the assembled document's style block.
    Style,
    /// JavaScript appended after the body.
    Script,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Markup, Language::Style, Language::Script];

    /// Stable slot index, used to key fixed-size per-language arrays.
    #[inline]
    #[must_use]
    pub fn slot(&self) -> usize {
        match self {
            Language::Markup => 0,
            Language::Style => 1,
            Language::Script => 2,
        }
    }

    /// Parses an external selector value (menu entry, file extension, CLI
    /// argument) into a slot language.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::UnsupportedLanguage`] for any value outside
    /// the closed set. Callers must not retry with the same value; the
    /// expected fallback is [`Language::Markup`].
    pub fn from_selector(selector: &str) -> Result<Self, crate::errors::UnsupportedLanguage> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" | "markup" => Ok(Language::Markup),
            "css" | "style" => Ok(Language::Style),
            "js" | "javascript" | "script" => Ok(Language::Script),
            _ => Err(crate::errors::UnsupportedLanguage {
                selector: selector.to_string(),
            }),
        }
    }

    /// Human-facing title, matching the pane headers.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Language::Markup => "HTML",
            Language::Style => "CSS",
            Language::Script => "JavaScript",
        }
    }

    /// Conventional file extension for exports of a single buffer.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "js",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_selector_accepts_aliases() {
        assert_eq!(Language::from_selector("html"), Ok(Language::Markup));
        assert_eq!(Language::from_selector("HTM"), Ok(Language::Markup));
        assert_eq!(Language::from_selector(" css "), Ok(Language::Style));
        assert_eq!(Language::from_selector("javascript"), Ok(Language::Script));
        assert_eq!(Language::from_selector("js"), Ok(Language::Script));
    }

    #[test]
    fn test_from_selector_rejects_unknown_values() {
        let err = Language::from_selector("python").unwrap_err();
        assert_eq!(err.selector, "python");

        assert!(Language::from_selector("").is_err());
    }

    #[test]
    fn test_slot_indices_are_distinct_and_dense() {
        let mut seen = [false; 3];
        for language in Language::ALL {
            assert!(!seen[language.slot()]);
            seen[language.slot()] = true;
        }
    }
}
