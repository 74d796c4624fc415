/// Owns the one-surface-per-slot invariant and the bus wiring.
///
/// Binding a slot that already has a live surface tears the old one down
/// first — teardown releases the surface and unsubscribes its bus handlers,
/// so repeated bind/teardown cycles never grow the subscriber registry.
pub struct SurfaceSlots {
    bus: std::rc::Rc<signal_bus::SignalBus>,
    slots: [Option<SlotEntry>; 3],
    teardowns: [u64; 3],
}

struct SlotEntry {
    surface: std::rc::Rc<std::cell::RefCell<crate::surface::EditableSurface>>,
    subscriptions: Vec<signal_bus::Subscription>,
}

impl SurfaceSlots {
    #[must_use]
    pub fn new(bus: std::rc::Rc<signal_bus::SignalBus>) -> Self {
        Self {
            bus,
            slots: [None, None, None],
            teardowns: [0, 0, 0],
        }
    }

    /// Allocates a live editing surface for `language` and wires it to the
    /// bus. Any prior surface in the same slot is torn down first.
    pub fn bind(
        &mut self,
        language: playground_core::language::Language,
        initial_text: &str,
        view: Box<dyn crate::surface::SurfaceView>,
        on_local_edit: crate::surface::LocalEditHandler,
    ) -> std::rc::Rc<std::cell::RefCell<crate::surface::EditableSurface>> {
        self.teardown(language);

        let surface = std::rc::Rc::new(std::cell::RefCell::new(
            crate::surface::EditableSurface::new(language, initial_text, view, on_local_edit),
        ));

        let mut subscriptions = Vec::with_capacity(3);

        let paste_surface = std::rc::Rc::clone(&surface);
        subscriptions.push(self.bus.subscribe_paste(move |cmd| {
            if cmd.target != language {
                return;
            }
            // Release the borrow before dispatching so the handler may
            // publish commands that land back on this surface.
            let notice = paste_surface.borrow_mut().apply_external_text(&cmd.text);
            if let Some(notice) = notice {
                notice.dispatch();
            }
        }));

        let highlight_surface = std::rc::Rc::clone(&surface);
        subscriptions.push(self.bus.subscribe_highlight(move |cmd| {
            if cmd.target != language {
                return;
            }
            highlight_surface
                .borrow_mut()
                .apply_highlights(&cmd.matches, &cmd.query, cmd.current);
        }));

        let clear_surface = std::rc::Rc::clone(&surface);
        subscriptions.push(self.bus.subscribe_clear(move |cmd| {
            if cmd.target != language {
                return;
            }
            clear_surface.borrow_mut().clear_highlights();
        }));

        self.slots[language.slot()] = Some(SlotEntry {
            surface: std::rc::Rc::clone(&surface),
            subscriptions,
        });

        surface
    }

    /// Tears down the surface bound to `language`, unsubscribing its bus
    /// handlers. Idempotent: an unbound slot is a no-op.
    pub fn teardown(&mut self, language: playground_core::language::Language) {
        let Some(entry) = self.slots[language.slot()].take() else {
            return;
        };

        for subscription in entry.subscriptions {
            self.bus.unsubscribe(subscription);
        }
        entry.surface.borrow_mut().teardown();
        self.teardowns[language.slot()] += 1;
    }

    #[must_use]
    pub fn surface(
        &self,
        language: playground_core::language::Language,
    ) -> Option<std::rc::Rc<std::cell::RefCell<crate::surface::EditableSurface>>> {
        self.slots[language.slot()]
            .as_ref()
            .map(|entry| std::rc::Rc::clone(&entry.surface))
    }

    /// How many times the given slot's surface has been torn down.
    #[must_use]
    pub fn teardown_count(&self, language: playground_core::language::Language) -> u64 {
        self.teardowns[language.slot()]
    }
}

/// Routes a widget's local-edit report through the surface, dispatching the
/// change notification after the surface borrow is released.
pub fn notify_local_edit(
    surface: &std::rc::Rc<std::cell::RefCell<crate::surface::EditableSurface>>,
    text: &str,
) {
    let notice = surface.borrow_mut().ingest_local_edit(text);
    if let Some(notice) = notice {
        notice.dispatch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::test_view::RecordingView;
    use playground_core::language::Language;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet_handler() -> crate::surface::LocalEditHandler {
        Rc::new(|_, _| {})
    }

    #[test]
    fn test_paste_targets_a_single_slot() {
        let bus = Rc::new(signal_bus::SignalBus::new());
        let mut slots = SurfaceSlots::new(Rc::clone(&bus));

        let markup = slots.bind(
            Language::Markup,
            "m",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );
        let style = slots.bind(
            Language::Style,
            "s",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );

        bus.publish_paste(signal_bus::PasteCommand {
            target: Language::Style,
            text: "body{}".to_string(),
        });

        assert_eq!(markup.borrow().text(), "m");
        assert_eq!(style.borrow().text(), "body{}");
    }

    #[test]
    fn test_paste_propagates_like_a_local_edit() {
        let bus = Rc::new(signal_bus::SignalBus::new());
        let mut slots = SurfaceSlots::new(Rc::clone(&bus));
        let edits = Rc::new(RefCell::new(Vec::new()));

        let edits_in = Rc::clone(&edits);
        slots.bind(
            Language::Markup,
            "",
            Box::new(RecordingView::default()),
            Rc::new(move |language, text| {
                edits_in.borrow_mut().push((language, text.to_string()));
            }),
        );

        bus.publish_paste(signal_bus::PasteCommand {
            target: Language::Markup,
            text: "<p>pasted</p>".to_string(),
        });
        // Re-delivery of the same value must not echo.
        bus.publish_paste(signal_bus::PasteCommand {
            target: Language::Markup,
            text: "<p>pasted</p>".to_string(),
        });

        assert_eq!(
            *edits.borrow(),
            vec![(Language::Markup, "<p>pasted</p>".to_string())]
        );
    }

    #[test]
    fn test_rebind_tears_down_exactly_once_without_leaking() {
        let bus = Rc::new(signal_bus::SignalBus::new());
        let mut slots = SurfaceSlots::new(Rc::clone(&bus));

        let first = slots.bind(
            Language::Script,
            "v1",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );
        assert_eq!(bus.subscriber_count(), 3);

        let second = slots.bind(
            Language::Script,
            "v2",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );

        assert_eq!(slots.teardown_count(Language::Script), 1);
        assert!(!first.borrow().is_alive());
        assert!(second.borrow().is_alive());
        // The old surface's subscriptions are gone, not accumulated.
        assert_eq!(bus.subscriber_count(), 3);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let bus = Rc::new(signal_bus::SignalBus::new());
        let mut slots = SurfaceSlots::new(Rc::clone(&bus));

        slots.bind(
            Language::Style,
            "",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );
        slots.teardown(Language::Style);
        slots.teardown(Language::Style);

        assert_eq!(slots.teardown_count(Language::Style), 1);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(slots.surface(Language::Style).is_none());
    }

    #[test]
    fn test_highlight_and_clear_commands_reach_the_surface() {
        let bus = Rc::new(signal_bus::SignalBus::new());
        let mut slots = SurfaceSlots::new(Rc::clone(&bus));

        let surface = slots.bind(
            Language::Markup,
            "abc abc",
            Box::new(RecordingView::default()),
            quiet_handler(),
        );

        bus.publish_highlight(signal_bus::HighlightCommand {
            target: Language::Markup,
            matches: vec![0, 4],
            query: "abc".to_string(),
            current: Some(1),
        });
        assert!(matches!(
            surface.borrow().decorations(),
            crate::surface::DecorationState::Highlighted { .. }
        ));

        bus.publish_clear(signal_bus::ClearHighlightCommand {
            target: Language::Markup,
        });
        assert_eq!(
            *surface.borrow().decorations(),
            crate::surface::DecorationState::Empty
        );
    }
}
