/// How the assembler and the copy/export paths treat the three buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Markup passes through verbatim; style and script are ignored
    /// entirely, in assembly as well as in copy/export.
    MarkupOnly,
    /// Style and script are inlined into a single self-contained document.
    Full,
}

/// The authoritative text for one language slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub language: crate::language::Language,
    pub text: String,
}

/// Owns the live text of all three buffers.
///
/// Exactly one writer mutates a buffer at a time: the bound editable
/// surface during interactive edits, or the run action when it copies the
/// store into a committed snapshot. The single-threaded event model
/// serializes all access, so no locking is involved.
#[derive(Debug)]
pub struct BufferStore {
    buffers: [Buffer; 3],

    /// Set on any edit since the last run action. Lets the UI hint that
    /// the preview is stale.
    dirty: bool,
}

impl BufferStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_contents("", "", "")
    }

    #[must_use]
    pub fn with_contents(markup: &str, style: &str, script: &str) -> Self {
        Self {
            buffers: [
                Buffer {
                    language: crate::language::Language::Markup,
                    text: markup.to_string(),
                },
                Buffer {
                    language: crate::language::Language::Style,
                    text: style.to_string(),
                },
                Buffer {
                    language: crate::language::Language::Script,
                    text: script.to_string(),
                },
            ],
            dirty: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self, language: crate::language::Language) -> &str {
        &self.buffers[language.slot()].text
    }

    /// Full-state replacement of one buffer. Every change notification from
    /// a surface carries the whole text, never a diff, so this is the only
    /// write primitive the store needs.
    pub fn set_text(&mut self, language: crate::language::Language, text: impl Into<String>) {
        let text = text.into();
        let buffer = &mut self.buffers[language.slot()];

        if buffer.text == text {
            return;
        }

        buffer.text = text;
        self.dirty = true;
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The run action: promotes the live buffers to a committed snapshot.
    /// All three fields are copied together; the snapshot is never
    /// partially updated afterwards.
    pub fn commit(&mut self) -> CommittedSnapshot {
        self.dirty = false;

        CommittedSnapshot {
            markup: self.text(crate::language::Language::Markup).to_string(),
            style: self.text(crate::language::Language::Style).to_string(),
            script: self.text(crate::language::Language::Script).to_string(),
        }
    }
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable copy of all three buffers taken at the moment of the last run
/// action. Replaced atomically by [`BufferStore::commit`], never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSnapshot {
    markup: String,
    style: String,
    script: String,
}

impl CommittedSnapshot {
    #[inline]
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    #[inline]
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_store_starts_clean_with_contents() {
        let store = BufferStore::with_contents("<p>hi</p>", "p{}", "void 0");

        assert_eq!(store.text(Language::Markup), "<p>hi</p>");
        assert_eq!(store.text(Language::Style), "p{}");
        assert_eq!(store.text(Language::Script), "void 0");
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_text_marks_dirty_and_commit_clears_it() {
        let mut store = BufferStore::new();

        store.set_text(Language::Style, "body{margin:0}");
        assert!(store.is_dirty());

        let snapshot = store.commit();
        assert!(!store.is_dirty());
        assert_eq!(snapshot.style(), "body{margin:0}");
        assert_eq!(snapshot.markup(), "");
    }

    #[test]
    fn test_set_text_with_identical_value_stays_clean() {
        let mut store = BufferStore::with_contents("same", "", "");

        store.set_text(Language::Markup, "same");
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_commit_copies_all_three_fields_together() {
        let mut store = BufferStore::with_contents("m1", "s1", "j1");
        let first = store.commit();

        // Later edits must not leak into the earlier snapshot.
        store.set_text(Language::Markup, "m2");
        store.set_text(Language::Script, "j2");
        let second = store.commit();

        assert_eq!((first.markup(), first.style(), first.script()), ("m1", "s1", "j1"));
        assert_eq!((second.markup(), second.style(), second.script()), ("m2", "s1", "j2"));
    }
}
