/// Drives the search lifecycle for whichever buffer is active and publishes
/// the resulting highlight commands on the bus.
///
/// Matches are recomputed from scratch on every query change, buffer edit,
/// or retarget; there is no incremental patching to go stale. Superseded
/// state is simply discarded and replaced.
pub struct SearchController {
    bus: std::rc::Rc<signal_bus::SignalBus>,
    target: playground_core::language::Language,
    state: playground_core::search::SearchState,
}

impl SearchController {
    #[must_use]
    pub fn new(
        bus: std::rc::Rc<signal_bus::SignalBus>,
        target: playground_core::language::Language,
    ) -> Self {
        Self {
            bus,
            target,
            state: playground_core::search::SearchState::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> playground_core::language::Language {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &playground_core::search::SearchState {
        &self.state
    }

    /// Runs a fresh query against `text`. An empty query clears highlights;
    /// a non-empty query publishes a highlight command immediately, with
    /// the current-match cursor on the first hit when one exists.
    pub fn set_query(&mut self, text: &str, query: &str) {
        self.state = playground_core::search::search(text, query);
        self.publish();
    }

    /// The active buffer's text changed shape: rerun the standing query.
    /// Offsets are invalidated by any edit, so this is a full recompute,
    /// with the cursor back on the first match.
    pub fn refresh(&mut self, text: &str) {
        let query = self.state.query.clone();
        self.set_query(text, &query);
    }

    /// Moves the search to a different buffer: highlights on the old target
    /// are cleared and the standing query reruns against the new text.
    pub fn retarget(&mut self, target: playground_core::language::Language, text: &str) {
        if self.target != target {
            self.bus.publish_clear(signal_bus::ClearHighlightCommand {
                target: self.target,
            });
            self.target = target;
        }
        self.refresh(text);
    }

    /// Advances the current-match cursor, wrapping past the last match.
    /// No-op with zero matches.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Moves the cursor backwards, wrapping past the first match.
    pub fn previous(&mut self) {
        self.step(self.state.matches.len().saturating_sub(1));
    }

    fn step(&mut self, delta: usize) {
        let count = self.state.matches.len();
        if count == 0 {
            return;
        }

        let at = self.state.current.unwrap_or(0);
        self.state.current = Some((at + delta) % count);
        self.publish();
    }

    fn publish(&self) {
        if self.state.query.is_empty() {
            self.bus.publish_clear(signal_bus::ClearHighlightCommand {
                target: self.target,
            });
            return;
        }

        self.bus.publish_highlight(signal_bus::HighlightCommand {
            target: self.target,
            matches: self.state.matches.clone(),
            query: self.state.query.clone(),
            current: self.state.current,
        });
    }
}
