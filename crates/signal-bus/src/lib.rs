//! Process-wide, unordered, fire-and-forget publish/subscribe channel.
//!
//! Decouples the editable surfaces from the producers of external mutation
//! commands (paste action, search navigation) without direct references
//! between them. Implemented as an explicit typed registry mapping message
//! kind to an ordered subscriber list, so subscribe/unsubscribe lifecycle
//! stays auditable.
//!
//! Delivery is synchronous and in subscription order per publish call;
//! ordering across message kinds is unspecified and must not be relied on.

use playground_core::language::Language;

/// Replace the entire content of the targeted surface with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteCommand {
    /// Commands are tagged with a target slot rather than broadcast, so two
    /// simultaneously bound surfaces never both apply one paste.
    pub target: Language,
    pub text: String,
}

/// Replace the targeted surface's decoration set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightCommand {
    pub target: Language,
    /// 0-based character offsets of every match start.
    pub matches: Vec<usize>,
    pub query: String,
    /// Index of the current match within `matches`, if any.
    pub current: Option<usize>,
}

/// Remove all decorations from the targeted surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearHighlightCommand {
    pub target: Language,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Paste,
    Highlight,
    Clear,
}

/// Token returned by every subscribe call; pass it back to
/// [`SignalBus::unsubscribe`] on teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    kind: Kind,
    id: u64,
}

type Handlers<T> = Vec<(u64, std::rc::Rc<dyn Fn(&T)>)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    paste: Handlers<PasteCommand>,
    highlight: Handlers<HighlightCommand>,
    clear: Handlers<ClearHighlightCommand>,
}

/// The bus itself. Single-threaded; shared as `Rc<SignalBus>`.
#[derive(Default)]
pub struct SignalBus {
    registry: std::cell::RefCell<Registry>,
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_paste(&self, handler: impl Fn(&PasteCommand) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.fresh_id();
        registry.paste.push((id, std::rc::Rc::new(handler)));

        Subscription {
            kind: Kind::Paste,
            id,
        }
    }

    pub fn subscribe_highlight(
        &self,
        handler: impl Fn(&HighlightCommand) + 'static,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.fresh_id();
        registry.highlight.push((id, std::rc::Rc::new(handler)));

        Subscription {
            kind: Kind::Highlight,
            id,
        }
    }

    pub fn subscribe_clear(
        &self,
        handler: impl Fn(&ClearHighlightCommand) + 'static,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.fresh_id();
        registry.clear.push((id, std::rc::Rc::new(handler)));

        Subscription {
            kind: Kind::Clear,
            id,
        }
    }

    /// Removes a subscriber. Idempotent: unsubscribing twice, or with a
    /// token from a subscriber already gone, is a no-op.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut registry = self.registry.borrow_mut();
        match subscription.kind {
            Kind::Paste => registry.paste.retain(|(id, _)| *id != subscription.id),
            Kind::Highlight => registry.highlight.retain(|(id, _)| *id != subscription.id),
            Kind::Clear => registry.clear.retain(|(id, _)| *id != subscription.id),
        }
    }

    /// Total live subscribers across all message kinds. Lets tests assert
    /// that repeated bind/teardown cycles do not grow the registry.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let registry = self.registry.borrow();
        registry.paste.len() + registry.highlight.len() + registry.clear.len()
    }

    pub fn publish_paste(&self, command: PasteCommand) {
        for handler in self.snapshot(|r| &r.paste) {
            handler(&command);
        }
    }

    pub fn publish_highlight(&self, command: HighlightCommand) {
        for handler in self.snapshot(|r| &r.highlight) {
            handler(&command);
        }
    }

    pub fn publish_clear(&self, command: ClearHighlightCommand) {
        for handler in self.snapshot(|r| &r.clear) {
            handler(&command);
        }
    }

    /// Clones the handler list out of the registry before delivering, so a
    /// handler may subscribe, unsubscribe, or publish again without hitting
    /// a borrow conflict. A handler removed mid-delivery still receives the
    /// in-flight message; subscribers guard with their own liveness flag.
    fn snapshot<T>(
        &self,
        select: impl Fn(&Registry) -> &Handlers<T>,
    ) -> Vec<std::rc::Rc<dyn Fn(&T)>> {
        let registry = self.registry.borrow();
        select(&registry)
            .iter()
            .map(|(_, handler)| std::rc::Rc::clone(handler))
            .collect()
    }
}

impl Registry {
    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = SignalBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe_paste(move |cmd| {
                log.borrow_mut().push(format!("{tag}:{}", cmd.text));
            });
        }

        bus.publish_paste(PasteCommand {
            target: Language::Markup,
            text: "x".to_string(),
        });

        assert_eq!(
            *log.borrow(),
            vec!["first:x", "second:x", "third:x"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery_and_is_idempotent() {
        let bus = SignalBus::new();
        let hits = Rc::new(std::cell::Cell::new(0));

        let hits_in = Rc::clone(&hits);
        let sub = bus.subscribe_clear(move |_| hits_in.set(hits_in.get() + 1));

        bus.publish_clear(ClearHighlightCommand {
            target: Language::Style,
        });
        assert_eq!(hits.get(), 1);

        bus.unsubscribe(sub);
        bus.unsubscribe(sub); // second call is a no-op

        bus.publish_clear(ClearHighlightCommand {
            target: Language::Style,
        });
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_kinds_are_independent() {
        let bus = SignalBus::new();
        let paste_hits = Rc::new(std::cell::Cell::new(0));
        let highlight_hits = Rc::new(std::cell::Cell::new(0));

        let p = Rc::clone(&paste_hits);
        bus.subscribe_paste(move |_| p.set(p.get() + 1));
        let h = Rc::clone(&highlight_hits);
        bus.subscribe_highlight(move |_| h.set(h.get() + 1));

        bus.publish_highlight(HighlightCommand {
            target: Language::Script,
            matches: vec![0, 4],
            query: "ab".to_string(),
            current: Some(1),
        });

        assert_eq!(paste_hits.get(), 0);
        assert_eq!(highlight_hits.get(), 1);
    }

    #[test]
    fn test_publishing_from_inside_a_handler_does_not_deadlock() {
        let bus = Rc::new(SignalBus::new());
        let cleared = Rc::new(std::cell::Cell::new(false));

        let bus_in = Rc::clone(&bus);
        bus.subscribe_paste(move |cmd| {
            // A handler reacting to one message kind by publishing another.
            bus_in.publish_clear(ClearHighlightCommand { target: cmd.target });
        });
        let cleared_in = Rc::clone(&cleared);
        bus.subscribe_clear(move |_| cleared_in.set(true));

        bus.publish_paste(PasteCommand {
            target: Language::Markup,
            text: String::new(),
        });
        assert!(cleared.get());
    }
}
