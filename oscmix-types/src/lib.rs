//! # oscmix-types
//!
//! Shared type definitions for the oscmix channel mixer.
//! This crate contains the message envelope, the typed action model and the
//! small value types used by both oscmix-core and the command-line driver.

pub mod action;
mod audio;
mod dispatch;
mod message;

pub use action::*;
pub use audio::{AudioAttrs, ContextState, NodeLifecycle, Rgba, WaveKind, MAX_NODE_VOLUME};
pub use dispatch::{DispatchResult, Dispatcher};
pub use message::{Message, DEACTIVATE_PREFIX};

/// Opaque key identifying a channel in the registry and a selector widget.
///
/// Keys are tokens: the core only compares them, it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ChannelKey(String);

impl ChannelKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ChannelKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
