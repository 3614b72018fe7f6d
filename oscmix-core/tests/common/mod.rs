#![allow(dead_code)]
//! Test harness utilities for oscmix-core integration tests.

use oscmix_core::audio::{ManualContext, RecordingLog, RecordingNodeFactory};
use oscmix_core::bus::MessageBus;
use oscmix_core::mixer::{Mixer, MixerSettings};
use oscmix_core::selector::{mount_group, SelectorTopics, SelectorWidget};
use oscmix_core::dispatch::MixerDispatcher;
use oscmix_core::state::{ChannelRegistry, ChannelSpec};
use oscmix_types::{ActionDefaults, AudioAttrs, ChannelKey, Message, WaveKind};

/// A mounted mixer plus one selector per channel, all on one bus.
pub struct Rig {
    pub bus: MessageBus,
    pub mixer: Mixer,
    pub widgets: Vec<SelectorWidget>,
    pub log: RecordingLog,
    pub context: ManualContext,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_settings(MixerSettings::default())
    }

    pub fn with_settings(settings: MixerSettings) -> Self {
        let bus = MessageBus::new();
        let context = ManualContext::new();
        let factory = RecordingNodeFactory::new();
        let log = factory.log();
        let specs = settings.channels.clone();
        let mixer = Mixer::mount(&bus, settings, Box::new(context.clone()), Box::new(factory));
        let widgets = mount_group(&bus, &SelectorTopics::default(), &specs);
        Self {
            bus,
            mixer,
            widgets,
            log,
            context,
        }
    }

    /// Publish on the mixer's topic.
    pub fn send(&self, message: Message) {
        let topic = self.mixer.topic().to_string();
        self.bus.publish(&topic, &message);
    }

    pub fn widget(&self, key: &str) -> &SelectorWidget {
        self.widgets
            .iter()
            .find(|w| w.key().as_str() == key)
            .unwrap_or_else(|| panic!("no widget {}", key))
    }

    pub fn active_keys(&self) -> Vec<String> {
        self.widgets
            .iter()
            .filter(|w| w.is_active())
            .map(|w| w.key().to_string())
            .collect()
    }

    /// Node index of the channel built for `wave`.
    pub fn node(&self, wave: WaveKind) -> usize {
        self.log
            .node_for_wave(wave)
            .unwrap_or_else(|| panic!("no node for {}", wave))
    }
}

/// A dispatcher over the four default channels with no nodes added yet.
pub fn bare_dispatcher() -> (MixerDispatcher, RecordingLog, ManualContext) {
    let context = ManualContext::new();
    let factory = RecordingNodeFactory::new();
    let log = factory.log();
    let registry = ChannelRegistry::new(
        ChannelSpec::one_per_wave(),
        AudioAttrs::default(),
        Box::new(factory),
    );
    let dispatcher = MixerDispatcher::new(
        registry,
        Box::new(context.clone()),
        ActionDefaults::default(),
    );
    (dispatcher, log, context)
}

pub fn key(s: &str) -> ChannelKey {
    ChannelKey::from(s)
}
