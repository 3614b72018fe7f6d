//! MixerDispatcher: Dispatcher implementation that owns the mixer state.

use oscmix_types::{
    Action, ActionDefaults, ChannelKey, DecodeError, DispatchResult, Dispatcher, Message,
};

use crate::audio::AudioContext;
use crate::state::ChannelRegistry;

use super::dispatch_action;

/// Owns the channel registry and the audio context, and turns bus messages
/// into registry operations.
pub struct MixerDispatcher {
    registry: ChannelRegistry,
    context: Box<dyn AudioContext>,
    defaults: ActionDefaults,
}

impl MixerDispatcher {
    pub fn new(
        registry: ChannelRegistry,
        context: Box<dyn AudioContext>,
        defaults: ActionDefaults,
    ) -> Self {
        Self {
            registry,
            context,
            defaults,
        }
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn context(&self) -> &dyn AudioContext {
        self.context.as_ref()
    }

    /// Decode and dispatch a raw bus message.
    ///
    /// Unknown kinds and malformed payloads are logged and ignored; the
    /// dispatcher keeps serving later messages either way.
    pub fn dispatch_message(&mut self, message: &Message) -> DispatchResult {
        match Action::decode(message, &self.defaults) {
            Ok(action) => self.dispatch(&action),
            Err(DecodeError::UnknownKind(kind)) => {
                log::warn!(target: "dispatch", "{} action not specified: {:?}", kind, message.payload);
                DispatchResult::none()
            }
            Err(e) => {
                log::warn!(target: "dispatch", "{}", e);
                DispatchResult::none()
            }
        }
    }

    pub fn mute(&mut self, id: &ChannelKey) -> bool {
        self.registry.mute(id)
    }

    pub fn unmute(&mut self, id: &ChannelKey) -> bool {
        self.registry.unmute(id)
    }

    pub fn set_volume(&mut self, id: &ChannelKey, volume: f32) -> bool {
        self.registry.set_volume(self.context.as_ref(), id, volume)
    }
}

impl Dispatcher for MixerDispatcher {
    fn dispatch(&mut self, action: &Action) -> DispatchResult {
        log::debug!(target: "dispatch", "{}", action.kind());
        dispatch_action(action, &mut self.registry, self.context.as_mut())
    }
}
