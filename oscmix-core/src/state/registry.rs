use oscmix_types::{AudioAttrs, ChannelKey, DispatchResult, FrequencyEntry, MAX_NODE_VOLUME};

use super::channel::{Channel, ChannelSpec};
use crate::audio::{AudioContext, NodeFactory, NodeSettings};

/// The fixed set of channels and the lifecycle operations over their nodes.
///
/// Every operation tolerates unknown keys and node-less channels: those are
/// logged and skipped, never errors. The channel set is decided at
/// construction and does not change afterwards.
pub struct ChannelRegistry {
    channels: Vec<Channel>,
    factory: Box<dyn NodeFactory>,
}

impl ChannelRegistry {
    pub fn new(
        specs: Vec<ChannelSpec>,
        initial_attrs: AudioAttrs,
        factory: Box<dyn NodeFactory>,
    ) -> Self {
        let mut channels: Vec<Channel> = Vec::with_capacity(specs.len());
        for spec in specs {
            if channels.iter().any(|c| *c.id() == spec.key) {
                log::warn!(target: "mixer", "duplicate channel key {} ignored", spec.key);
                continue;
            }
            channels.push(Channel::new(spec, initial_attrs));
        }
        Self { channels, factory }
    }

    pub fn channel(&self, id: &ChannelKey) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id() == id)
    }

    fn channel_mut(&mut self, id: &ChannelKey) -> Option<&mut Channel> {
        let found = self.channels.iter_mut().find(|c| c.id() == id);
        if found.is_none() {
            log::debug!(target: "mixer", "no channel {}", id);
        }
        found
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> + '_ {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Create the node for `id` using the channel's wave kind.
    ///
    /// Returns `false` for an unknown channel or one that already has a
    /// node; an existing node is never replaced.
    pub fn add_node(&mut self, context: &dyn AudioContext, id: &ChannelKey, init_freq: f64) -> bool {
        let factory = &self.factory;
        let Some(channel) = self.channels.iter_mut().find(|c| c.id() == id) else {
            log::warn!(target: "mixer", "cannot add node: no channel {}", id);
            return false;
        };
        if channel.node.is_some() {
            log::warn!(target: "mixer", "channel {} already has a node, keeping it", id);
            return false;
        }
        log::info!(target: "mixer", "adding {} node to {} at {} Hz", channel.wave(), id, init_freq);
        let settings = NodeSettings {
            wave: channel.wave(),
            max_volume: MAX_NODE_VOLUME,
            frequency: init_freq,
        };
        channel.node = Some(factory.create(context, settings));
        true
    }

    /// Start every node that exists and has not started yet, then re-apply
    /// its mute flag so channels created muted stay muted.
    pub fn start_all(&mut self) -> DispatchResult {
        let mut result = DispatchResult::none();
        for channel in &mut self.channels {
            let muted = channel.audio_attrs.muted;
            let Some(node) = channel.node.as_mut() else {
                continue;
            };
            if node.started() {
                continue;
            }
            if let Err(e) = node.start() {
                log::warn!(target: "mixer", "failed to start {}: {}", channel.id(), e);
                result.skipped += 1;
                continue;
            }
            result.applied += 1;
            if muted {
                if let Err(e) = node.mute() {
                    log::warn!(target: "mixer", "failed to re-mute {}: {}", channel.id(), e);
                }
            }
        }
        result
    }

    pub fn mute(&mut self, id: &ChannelKey) -> bool {
        self.set_muted(id, true)
    }

    pub fn unmute(&mut self, id: &ChannelKey) -> bool {
        self.set_muted(id, false)
    }

    /// Returns `true` if a node was told about the change.
    fn set_muted(&mut self, id: &ChannelKey, muted: bool) -> bool {
        let Some(channel) = self.channel_mut(id) else {
            return false;
        };
        channel.audio_attrs.muted = muted;
        let Some(node) = channel.node.as_mut() else {
            return false;
        };
        let outcome = if muted { node.mute() } else { node.unmute() };
        match outcome {
            Ok(()) => true,
            Err(e) => {
                log::warn!(target: "mixer", "failed to set mute={} on {}: {}", muted, id, e);
                false
            }
        }
    }

    /// Set the channel volume (clamped to 0..=1), ramping from the context's current time.
    pub fn set_volume(&mut self, context: &dyn AudioContext, id: &ChannelKey, volume: f32) -> bool {
        if !volume.is_finite() {
            log::warn!(target: "mixer", "ignoring non-finite volume for {}", id);
            return false;
        }
        let Some(channel) = self.channel_mut(id) else {
            return false;
        };
        let volume = volume.clamp(0.0, 1.0);
        channel.audio_attrs.volume = volume;
        let Some(node) = channel.node.as_mut() else {
            return false;
        };
        match node.update_volume(volume, context.current_time()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(target: "mixer", "failed to set volume on {}: {}", id, e);
                false
            }
        }
    }

    /// Apply each entry independently. A bad entry is skipped; the rest of
    /// the batch still runs.
    pub fn set_frequencies(
        &mut self,
        context: &dyn AudioContext,
        batch: &[FrequencyEntry],
    ) -> DispatchResult {
        let at_time = context.current_time();
        let mut result = DispatchResult::none();
        for entry in batch {
            let Some(freq) = entry.freq.filter(|f| f.is_finite() && *f > 0.0) else {
                log::debug!(target: "mixer", "skipping frequency for {}: not a usable number", entry.channel);
                result.skipped += 1;
                continue;
            };
            let Some(node) = self
                .channel_mut(&entry.channel)
                .and_then(|c| c.node.as_mut())
            else {
                result.skipped += 1;
                continue;
            };
            match node.update_freq(freq, at_time) {
                Ok(()) => result.applied += 1,
                Err(e) => {
                    log::warn!(target: "mixer", "failed to set frequency on {}: {}", entry.channel, e);
                    result.skipped += 1;
                }
            }
        }
        result
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.channels)
            .finish()
    }
}
