//! Mixer state: the channel records and the registry that owns them.

mod channel;
mod registry;

pub use channel::{Channel, ChannelSnapshot, ChannelSpec};
pub use registry::ChannelRegistry;
