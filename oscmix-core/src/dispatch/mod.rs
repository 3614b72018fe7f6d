mod local;

pub use local::MixerDispatcher;

use oscmix_types::{Action, ContextState, DispatchResult};

use crate::audio::AudioContext;
use crate::state::ChannelRegistry;

/// Dispatch an action against the registry and the shared audio context.
///
/// This is the only place the audio context is resumed or suspended.
pub fn dispatch_action(
    action: &Action,
    registry: &mut ChannelRegistry,
    context: &mut dyn AudioContext,
) -> DispatchResult {
    match action {
        Action::Init => {
            let mut result = DispatchResult::none();
            if context.state() == ContextState::Suspended {
                log::info!(target: "dispatch", "resuming audio context");
                context.resume();
                result.context_changed = true;
            }
            result.merge(registry.start_all());
            result
        }
        Action::AddNode { channel, init_freq } => {
            if registry.add_node(&*context, channel, *init_freq) {
                DispatchResult::applied(1)
            } else {
                DispatchResult {
                    skipped: 1,
                    ..DispatchResult::none()
                }
            }
        }
        Action::UpdateFrequencies(batch) => registry.set_frequencies(&*context, batch),
        Action::SuspendContext => {
            log::info!(target: "dispatch", "suspending audio context");
            context.suspend();
            DispatchResult {
                context_changed: true,
                ..DispatchResult::none()
            }
        }
        Action::SelectWave { key, wave, .. } => {
            log::debug!(target: "dispatch", "selector {} picked {}", key, wave);
            DispatchResult::none()
        }
    }
}
