//! Synchronous publish/subscribe bus
//!
//! The only coordination channel between the real-time simulation and the
//! turn logic. Handlers run synchronously, in subscription order, inside the
//! `publish` call that triggered them. Nothing else is guaranteed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::sim::{Aabb, Cell, Marker, Outcome};
use crate::sim::turn::Role;

/// Topic names used by the game
pub mod topics {
    /// Published by the tick loop after every simulated frame
    pub const FRAME_COMPLETE: &str = "frame-complete";
    /// A marker landed on the board
    pub const MARKER_PLACED: &str = "marker-placed";
    /// The active player changed
    pub const TURN_CHANGED: &str = "turn-changed";
    /// The session is over (decided board or collision)
    pub const GAME_OVER: &str = "game-over";
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// The board was won or filled
    Decided(Outcome),
    /// The avatar was hit by an obstacle
    Collision,
}

/// Payload carried by game topics
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    FrameComplete { frame: u64, dt: f32, avatar: Aabb },
    MarkerPlaced { cell: Cell, marker: Marker },
    TurnChanged { active: Marker, role: Role },
    GameOver(GameEnd),
}

/// A subscribed handler. Identity (for idempotent subscribe and for
/// unsubscribe) is the `Rc` allocation.
pub type Handler<P> = Rc<dyn Fn(Option<&P>)>;

/// Wrap a closure as a [`Handler`]
pub fn handler<P, F>(f: F) -> Handler<P>
where
    F: Fn(Option<&P>) + 'static,
{
    Rc::new(f)
}

/// Topic-keyed handler registry
pub struct EventBus<P = GameEvent> {
    topics: RefCell<HashMap<String, Vec<Handler<P>>>>,
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self {
            topics: RefCell::new(HashMap::new()),
        }
    }

    /// Register `handler` for `topic`.
    ///
    /// Returns `false` without registering when the topic name is blank or
    /// the same handler is already subscribed to that topic.
    pub fn subscribe(&self, topic: &str, handler: Handler<P>) -> bool {
        if topic.trim().is_empty() {
            log::warn!("Rejected subscription to a blank topic");
            return false;
        }

        let mut topics = self.topics.borrow_mut();
        let handlers = topics.entry(topic.to_string()).or_default();
        if handlers.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove a specific handler. Returns whether it was subscribed.
    pub fn unsubscribe(&self, topic: &str, handler: &Handler<P>) -> bool {
        let mut topics = self.topics.borrow_mut();
        let Some(handlers) = topics.get_mut(topic) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|h| !Rc::ptr_eq(h, handler));
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            topics.remove(topic);
        }
        removed
    }

    /// Invoke every handler subscribed to `topic`, in subscription order.
    ///
    /// The handler list is captured before dispatch, so handlers may publish
    /// or change subscriptions; those changes apply to the next publish.
    pub fn publish(&self, topic: &str, payload: Option<&P>) {
        let handlers = match self.topics.borrow().get(topic) {
            Some(handlers) => handlers.clone(),
            None => return,
        };
        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of handlers on a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.borrow().get(topic).map_or(0, Vec::len)
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.topics.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> Handler<u32> {
        let log = log.clone();
        let tag = tag.to_string();
        handler(move |payload: Option<&u32>| {
            log.borrow_mut().push(format!("{tag}:{payload:?}"));
        })
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let bus = EventBus::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe("t", recorder(&log, "a"));
        bus.subscribe("t", recorder(&log, "b"));

        bus.publish("t", Some(&7));
        assert_eq!(*log.borrow(), vec!["a:Some(7)", "b:Some(7)"]);
    }

    #[test]
    fn test_subscribe_same_handler_twice_is_noop() {
        let bus = EventBus::<u32>::new();
        let count = Rc::new(StdCell::new(0));
        let c = count.clone();
        let h = handler(move |_: Option<&u32>| c.set(c.get() + 1));

        assert!(bus.subscribe("t", h.clone()));
        assert!(!bus.subscribe("t", h.clone()));
        bus.publish("t", None);
        assert_eq!(count.get(), 1);

        // Same handler on another topic is a separate registration
        assert!(bus.subscribe("u", h));
        assert_eq!(bus.subscriber_count("u"), 1);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_handler() {
        let bus = EventBus::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        bus.subscribe("t", a.clone());
        bus.subscribe("t", b);

        assert!(bus.unsubscribe("t", &a));
        assert!(!bus.unsubscribe("t", &a));
        bus.publish("t", None);
        assert_eq!(*log.borrow(), vec!["b:None"]);
    }

    #[test]
    fn test_publish_unknown_topic_is_noop() {
        let bus = EventBus::<u32>::new();
        bus.publish("nobody-listens", Some(&1));
        assert_eq!(bus.subscriber_count("nobody-listens"), 0);
    }

    #[test]
    fn test_blank_topic_rejected() {
        let bus = EventBus::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(!bus.subscribe("   ", recorder(&log, "a")));
        assert!(!bus.subscribe("", recorder(&log, "a")));
        bus.publish("", None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_publish() {
        let bus = Rc::new(EventBus::<u32>::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = Rc::downgrade(&bus);
        bus.subscribe(
            "outer",
            handler(move |_: Option<&u32>| {
                if let Some(bus) = inner_bus.upgrade() {
                    bus.publish("inner", Some(&2));
                }
            }),
        );
        bus.subscribe("inner", recorder(&log, "inner"));

        bus.publish("outer", None);
        assert_eq!(*log.borrow(), vec!["inner:Some(2)"]);
    }
}
