/// The seam to the concrete editing widget.
///
/// The surface pushes state down through this trait; it never reads back.
/// Offsets are 0-based character positions into the surface text.
pub trait SurfaceView {
    /// Replaces the widget's entire content.
    fn set_text(&mut self, text: &str);

    /// Replaces the widget's decoration set: every match marked, the
    /// current match marked distinctly.
    fn apply_decorations(&mut self, matches: &[usize], query_len: usize, current: Option<usize>);

    /// Removes all decorations unconditionally.
    fn clear_decorations(&mut self);

    /// Scrolls so `[start, end)` is visible and places the selection over it.
    fn reveal(&mut self, start: usize, end: usize);
}

/// Decoration lifecycle: `Empty → Highlighted → Empty`, with
/// `Highlighted → Highlighted` on new searches or index navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationState {
    Empty,
    Highlighted {
        matches: Vec<usize>,
        query_len: usize,
        current: Option<usize>,
    },
}

/// Fired synchronously with the surface's full current text on every local
/// edit. The payload is the whole text, not a diff; consumers treat every
/// notification as a full-state refresh.
pub type LocalEditHandler = std::rc::Rc<dyn Fn(playground_core::language::Language, &str)>;

/// A mutation that changed the surface, carrying the notification to fire
/// once the surface borrow has been released. Dispatching outside the
/// borrow lets the handler publish bus commands that loop straight back
/// into this same surface.
#[must_use = "dispatch the notice or the buffer store will not hear about the edit"]
pub struct EditNotice {
    handler: LocalEditHandler,
    language: playground_core::language::Language,
    text: String,
}

impl EditNotice {
    pub fn dispatch(self) {
        (self.handler)(self.language, &self.text);
    }
}

/// One live, mutable editing surface bound to a language slot.
///
/// Owns a transient copy of the buffer text during interactive edits; the
/// buffer store hears about every change through the local-edit handler.
pub struct EditableSurface {
    language: playground_core::language::Language,
    text: String,
    decorations: DecorationState,
    view: Box<dyn SurfaceView>,
    on_local_edit: LocalEditHandler,

    /// Cleared by teardown. A message reaching a torn-down surface is
    /// simply ignored.
    alive: bool,
}

impl EditableSurface {
    pub fn new(
        language: playground_core::language::Language,
        initial_text: &str,
        mut view: Box<dyn SurfaceView>,
        on_local_edit: LocalEditHandler,
    ) -> Self {
        view.set_text(initial_text);

        Self {
            language,
            text: initial_text.to_string(),
            decorations: DecorationState::Empty,
            view,
            on_local_edit,
            alive: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn language(&self) -> playground_core::language::Language {
        self.language
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn decorations(&self) -> &DecorationState {
        &self.decorations
    }

    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// The widget reports a user-driven mutation with its full new text.
    ///
    /// Existing decoration offsets are invalidated by any shape change, so
    /// the policy here is clear-and-recompute: decorations drop to `Empty`
    /// and the search controller re-derives them from the fresh text.
    pub fn ingest_local_edit(&mut self, text: &str) -> Option<EditNotice> {
        if !self.alive || self.text == text {
            return None;
        }

        self.text = text.to_string();
        self.drop_decorations();

        Some(EditNotice {
            handler: std::rc::Rc::clone(&self.on_local_edit),
            language: self.language,
            text: self.text.clone(),
        })
    }

    /// Replaces the entire surface content from an external command.
    ///
    /// Value-equality guarded: when `text` already equals the current text
    /// this is a no-op, which breaks the feedback loop when the command was
    /// itself derived from a local edit that already propagated. The
    /// returned notice updates the owning buffer exactly like a local edit;
    /// the guard is what keeps it from echoing forever.
    pub fn apply_external_text(&mut self, text: &str) -> Option<EditNotice> {
        if !self.alive || self.text == text {
            return None;
        }

        self.text = text.to_string();
        self.view.set_text(text);
        self.drop_decorations();

        Some(EditNotice {
            handler: std::rc::Rc::clone(&self.on_local_edit),
            language: self.language,
            text: self.text.clone(),
        })
    }

    /// Replaces the decoration set. Zero matches is equivalent to
    /// [`EditableSurface::clear_highlights`]. An in-range current index
    /// additionally scrolls the match into view and selects it.
    pub fn apply_highlights(&mut self, matches: &[usize], query: &str, current: Option<usize>) {
        if !self.alive {
            return;
        }

        if matches.is_empty() {
            self.clear_highlights();
            return;
        }

        let query_len = query.chars().count();
        self.decorations = DecorationState::Highlighted {
            matches: matches.to_vec(),
            query_len,
            current,
        };
        self.view.apply_decorations(matches, query_len, current);

        if let Some(index) = current
            && let Some(&start) = matches.get(index)
        {
            self.view.reveal(start, start + query_len);
        }
    }

    pub fn clear_highlights(&mut self) {
        if !self.alive {
            return;
        }
        self.drop_decorations();
    }

    /// Releases the surface. Idempotent: calling twice is not an error.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.drop_decorations();
        self.alive = false;
    }

    fn drop_decorations(&mut self) {
        if self.decorations != DecorationState::Empty {
            self.decorations = DecorationState::Empty;
            self.view.clear_decorations();
        }
    }
}
