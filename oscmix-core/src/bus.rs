//! In-process publish/subscribe bus.
//!
//! Delivery is synchronous: `publish` calls every handler registered for the
//! topic, in subscription order, and returns only once all of them have run.
//! A handler may publish again; the nested delivery completes before the outer
//! one moves on to its next handler.
//!
//! `MessageBus` is a cheap handle (`Rc` inside). Clones share one subscriber
//! table, so widgets and the mixer each keep their own handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use oscmix_types::Message;

/// Result returned by a bus handler.
pub type HandlerResult = Result<(), BusError>;

type Handler = Rc<RefCell<dyn FnMut(&Message) -> HandlerResult>>;

/// Error reported by (or on behalf of) a handler. Never propagates to the publisher.
#[derive(Debug, Clone, PartialEq)]
pub enum BusError {
    /// The handler was still running when the message reached it again.
    Reentrant,
    /// The handler rejected the message.
    Handler(String),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Reentrant => write!(f, "handler is already running"),
            BusError::Handler(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for BusError {}

impl From<String> for BusError {
    fn from(s: String) -> Self {
        BusError::Handler(s)
    }
}

/// Handle returned by [`MessageBus::subscribe`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of a single `publish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handlers that ran and returned `Ok`
    pub delivered: usize,
    /// Handlers that returned `Err` or were skipped as re-entrant
    pub failed: usize,
}

struct Subscriber {
    id: SubscriptionId,
    topic: String,
    handler: Handler,
}

#[derive(Default)]
struct Subscribers {
    entries: Vec<Subscriber>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct MessageBus {
    inner: Rc<RefCell<Subscribers>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`. It receives every message published on
    /// the topic from now on, after all handlers registered before it.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: FnMut(&Message) -> HandlerResult + 'static,
    {
        let mut subs = self.inner.borrow_mut();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.entries.push(Subscriber {
            id,
            topic: topic.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });
        log::debug!(target: "bus", "subscribe {:?} to {}", id, topic);
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.borrow_mut();
        let before = subs.entries.len();
        subs.entries.retain(|s| s.id != id);
        let removed = subs.entries.len() != before;
        if removed {
            log::debug!(target: "bus", "unsubscribe {:?}", id);
        }
        removed
    }

    /// Deliver `message` to every handler currently subscribed to `topic`.
    ///
    /// The handler list is captured before the first call: handlers added
    /// during delivery miss this message. A failing handler is logged and
    /// does not stop delivery to the rest.
    pub fn publish(&self, topic: &str, message: &Message) -> Delivery {
        let handlers: Vec<(SubscriptionId, Handler)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        if handlers.is_empty() {
            log::trace!(target: "bus", "{} dropped on {}: no subscribers", message.kind, topic);
            return Delivery::default();
        }

        let mut delivery = Delivery::default();
        for (id, handler) in handlers {
            let result = match handler.try_borrow_mut() {
                Ok(mut h) => (&mut *h)(message),
                Err(_) => Err(BusError::Reentrant),
            };
            match result {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    delivery.failed += 1;
                    log::warn!(target: "bus", "handler {:?} on {} failed for {}: {}", id, topic, message.kind, e);
                }
            }
        }
        delivery
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subs = self.inner.borrow();
        f.debug_struct("MessageBus")
            .field("subscriptions", &subs.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> impl FnMut(&Message) -> HandlerResult {
        let log = Rc::clone(log);
        move |msg: &Message| {
            log.borrow_mut().push(format!("{}:{}", tag, msg.kind));
            Ok(())
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe("t", recorder(&log, "a"));
        bus.subscribe("t", recorder(&log, "b"));
        bus.subscribe("other", recorder(&log, "c"));

        let delivery = bus.publish("t", &Message::new("PING"));
        assert_eq!(delivery.delivered, 2);
        assert_eq!(*log.borrow(), vec!["a:PING", "b:PING"]);
    }

    #[test]
    fn topic_without_subscribers_drops_silently() {
        let bus = MessageBus::new();
        assert_eq!(bus.publish("nobody", &Message::new("PING")), Delivery::default());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = bus.subscribe("t", recorder(&log, "a"));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish("t", &Message::new("PING"));
        assert!(log.borrow().is_empty());
        assert_eq!(bus.subscriber_count("t"), 0);
    }

    #[test]
    fn failing_handler_does_not_block_later_handlers() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe("t", |_: &Message| Err(BusError::from("boom".to_string())));
        bus.subscribe("t", recorder(&log, "b"));

        let delivery = bus.publish("t", &Message::new("PING"));
        assert_eq!(delivery, Delivery { delivered: 1, failed: 1 });
        assert_eq!(*log.borrow(), vec!["b:PING"]);
    }

    #[test]
    fn nested_publish_completes_before_outer_continues() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = bus.clone();
        let first_log = Rc::clone(&log);
        bus.subscribe("outer", move |msg: &Message| {
            first_log.borrow_mut().push(format!("first:{}", msg.kind));
            inner_bus.publish("inner", &Message::new("NESTED"));
            Ok(())
        });
        bus.subscribe("outer", recorder(&log, "second"));
        bus.subscribe("inner", recorder(&log, "inner"));

        bus.publish("outer", &Message::new("GO"));
        assert_eq!(
            *log.borrow(),
            vec!["first:GO", "inner:NESTED", "second:GO"]
        );
    }

    #[test]
    fn handler_subscribed_during_publish_misses_current_message() {
        let bus = MessageBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let late_log = Rc::clone(&log);
        let handle = bus.clone();
        let added = Rc::new(Cell::new(false));
        let added_flag = Rc::clone(&added);
        bus.subscribe("t", move |_: &Message| {
            if !added_flag.get() {
                added_flag.set(true);
                handle.subscribe("t", recorder(&late_log, "late"));
            }
            Ok(())
        });

        bus.publish("t", &Message::new("ONE"));
        assert!(log.borrow().is_empty());
        bus.publish("t", &Message::new("TWO"));
        assert_eq!(*log.borrow(), vec!["late:TWO"]);
    }

    #[test]
    fn reentrant_delivery_to_running_handler_is_skipped() {
        let bus = MessageBus::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handle = bus.clone();
        bus.subscribe("loop", move |_: &Message| {
            counter.set(counter.get() + 1);
            let nested = handle.publish("loop", &Message::new("AGAIN"));
            assert_eq!(nested.failed, 1);
            Ok(())
        });

        let delivery = bus.publish("loop", &Message::new("START"));
        assert_eq!(delivery.delivered, 1);
        assert_eq!(calls.get(), 1);
    }
}
