//! Selector widgets and the radio-group protocol.
//!
//! There is no selection owner. Each widget subscribes to the selection
//! topic and drops its `active` flag whenever it sees a deactivation
//! broadcast from any *other* widget. On click a widget flips its own flag
//! and then broadcasts `DEACTIVATE:<own key>`; every sibling deactivates
//! while the sender, matching its own key, is left alone. Because `publish`
//! is synchronous, the broadcast has reached every sibling by the time
//! `click` returns.

use std::cell::Cell;
use std::rc::Rc;

use oscmix_types::{Action, ChannelKey, Message, Rgba, WaveKind};

use crate::bus::{Delivery, MessageBus, SubscriptionId};
use crate::state::ChannelSpec;

/// Topics a selector group talks on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTopics {
    /// Deactivation broadcasts between siblings
    pub selection: String,
    /// Where click events (`SELECT_WAVE`) are published
    pub events: String,
}

impl Default for SelectorTopics {
    fn default() -> Self {
        Self {
            selection: "selection".to_string(),
            events: "widget-events".to_string(),
        }
    }
}

pub struct SelectorWidget {
    key: ChannelKey,
    wave: WaveKind,
    color: Rgba,
    active: Rc<Cell<bool>>,
    bus: MessageBus,
    topics: SelectorTopics,
    subscription: SubscriptionId,
}

impl SelectorWidget {
    /// Mount a widget: subscribe it to the selection topic with the given
    /// initial `active` value.
    pub fn new(
        bus: &MessageBus,
        topics: SelectorTopics,
        key: ChannelKey,
        wave: WaveKind,
        color: Rgba,
        active: bool,
    ) -> Self {
        let active = Rc::new(Cell::new(active));
        let flag = Rc::clone(&active);
        let own_key = key.clone();
        let subscription = bus.subscribe(&topics.selection, move |msg: &Message| {
            if !msg.is_deactivate_from(&own_key) {
                flag.set(false);
            }
            Ok(())
        });
        Self {
            key,
            wave,
            color,
            active,
            bus: bus.clone(),
            topics,
            subscription,
        }
    }

    pub fn from_spec(bus: &MessageBus, topics: SelectorTopics, spec: &ChannelSpec, active: bool) -> Self {
        Self::new(bus, topics, spec.key.clone(), spec.wave, spec.color, active)
    }

    pub fn key(&self) -> &ChannelKey {
        &self.key
    }

    pub fn wave(&self) -> WaveKind {
        self.wave
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Handle a user click: announce the selection, toggle, then tell the
    /// siblings to deactivate. Returns the delivery of the deactivation broadcast.
    pub fn click(&self) -> Delivery {
        let event = Action::SelectWave {
            key: self.key.clone(),
            wave: self.wave,
            color: self.color,
        };
        self.bus.publish(&self.topics.events, &event.to_message());

        self.active.set(!self.active.get());
        log::debug!(target: "selector", "{} active={}", self.key, self.active.get());

        self.bus
            .publish(&self.topics.selection, &Message::deactivate(&self.key))
    }
}

impl Drop for SelectorWidget {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for SelectorWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorWidget")
            .field("key", &self.key)
            .field("active", &self.active.get())
            .finish()
    }
}

/// Mount one widget per channel, all inactive.
pub fn mount_group(bus: &MessageBus, topics: &SelectorTopics, specs: &[ChannelSpec]) -> Vec<SelectorWidget> {
    specs
        .iter()
        .map(|spec| SelectorWidget::from_spec(bus, topics.clone(), spec, false))
        .collect()
}
