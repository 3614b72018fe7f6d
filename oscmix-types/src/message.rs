//! Bus message envelope.

use serde::{Deserialize, Serialize};

use crate::ChannelKey;

/// Kind prefix of selection-topic broadcasts. The widget key follows it.
pub const DEACTIVATE_PREFIX: &str = "DEACTIVATE:";

/// Untyped message carried on every bus topic.
///
/// `kind` discriminates; `payload` is free-form JSON and may be absent.
/// The dispatcher turns it into a typed [`crate::Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Message {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// Selection broadcast issued by the widget owning `key`.
    pub fn deactivate(key: &ChannelKey) -> Self {
        Self::new(format!("{}{}", DEACTIVATE_PREFIX, key))
    }

    /// True if this is the deactivation broadcast issued by `key` itself.
    pub fn is_deactivate_from(&self, key: &ChannelKey) -> bool {
        self.kind
            .strip_prefix(DEACTIVATE_PREFIX)
            .is_some_and(|k| k == key.as_str())
    }
}
