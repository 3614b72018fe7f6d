//! Mixer mount and teardown.
//!
//! Mounting builds the registry, eagerly adds one node per configured
//! channel, and only then subscribes the dispatcher to its bus topic.
//! Dropping the `Mixer` unsubscribes it and releases the nodes.

use std::cell::RefCell;
use std::rc::Rc;

use oscmix_types::{
    Action, ActionDefaults, AudioAttrs, ChannelKey, ContextState, DispatchResult, Dispatcher,
    Message,
};

use crate::audio::{AudioContext, NodeFactory};
use crate::bus::{BusError, MessageBus, SubscriptionId};
use crate::config::Config;
use crate::dispatch::MixerDispatcher;
use crate::state::{ChannelRegistry, ChannelSnapshot, ChannelSpec};

/// Everything `Mixer::mount` needs besides its audio collaborators.
#[derive(Debug, Clone)]
pub struct MixerSettings {
    pub topic: String,
    pub channels: Vec<ChannelSpec>,
    pub initial_attrs: AudioAttrs,
    pub defaults: ActionDefaults,
    pub mount_frequency: f64,
}

impl MixerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            topic: config.mixer_topic().to_string(),
            channels: config.channel_specs(),
            initial_attrs: config.initial_attrs(),
            defaults: config.action_defaults(),
            mount_frequency: config.mount_frequency(),
        }
    }
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self::from_config(&Config::embedded())
    }
}

pub struct Mixer {
    dispatcher: Rc<RefCell<MixerDispatcher>>,
    bus: MessageBus,
    topic: String,
    subscription: SubscriptionId,
}

impl Mixer {
    pub fn mount(
        bus: &MessageBus,
        settings: MixerSettings,
        context: Box<dyn AudioContext>,
        factory: Box<dyn NodeFactory>,
    ) -> Self {
        log::info!(target: "mixer", "audio context state: {:?}", context.state());
        let keys: Vec<ChannelKey> = settings.channels.iter().map(|c| c.key.clone()).collect();
        let registry = ChannelRegistry::new(settings.channels, settings.initial_attrs, factory);
        let mut dispatcher = MixerDispatcher::new(registry, context, settings.defaults);

        for key in keys {
            dispatcher.dispatch(&Action::AddNode {
                channel: key,
                init_freq: settings.mount_frequency,
            });
        }

        let dispatcher = Rc::new(RefCell::new(dispatcher));
        let target = Rc::clone(&dispatcher);
        let subscription = bus.subscribe(&settings.topic, move |msg: &Message| {
            let mut dispatcher = target.try_borrow_mut().map_err(|_| BusError::Reentrant)?;
            dispatcher.dispatch_message(msg);
            Ok(())
        });

        Self {
            dispatcher,
            bus: bus.clone(),
            topic: settings.topic,
            subscription,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Dispatch directly, bypassing the bus.
    pub fn dispatch(&self, action: &Action) -> DispatchResult {
        self.dispatcher.borrow_mut().dispatch(action)
    }

    pub fn mute(&self, id: &ChannelKey) -> bool {
        self.dispatcher.borrow_mut().mute(id)
    }

    pub fn unmute(&self, id: &ChannelKey) -> bool {
        self.dispatcher.borrow_mut().unmute(id)
    }

    pub fn set_volume(&self, id: &ChannelKey, volume: f32) -> bool {
        self.dispatcher.borrow_mut().set_volume(id, volume)
    }

    pub fn snapshots(&self) -> Vec<ChannelSnapshot> {
        self.dispatcher
            .borrow()
            .registry()
            .channels()
            .map(|c| c.snapshot())
            .collect()
    }

    pub fn channel(&self, id: &ChannelKey) -> Option<ChannelSnapshot> {
        self.dispatcher
            .borrow()
            .registry()
            .channel(id)
            .map(|c| c.snapshot())
    }

    pub fn context_state(&self) -> ContextState {
        self.dispatcher.borrow().context().state()
    }
}

impl Drop for Mixer {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
        log::debug!(target: "mixer", "unmounted from {}", self.topic);
    }
}
