//! Action types for the dispatch system.
//!
//! Bus messages arrive as untyped [`Message`] envelopes. [`Action::decode`]
//! turns a recognized envelope into one variant per action kind, applying
//! field defaults on the way; anything else becomes a [`DecodeError`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{ChannelKey, Message, Rgba, WaveKind};

/// Wire names of recognized action kinds.
pub mod kind {
    pub const INIT: &str = "INIT";
    pub const ADD_NODE: &str = "ADD_NODE";
    pub const UPDATE_FREQUENCIES: &str = "UPDATE_FREQUENCIES";
    pub const SUSPEND_CONTEXT: &str = "SUSPEND_CONTEXT";
    pub const SELECT_WAVE: &str = "SELECT_WAVE";

    // Names used by the first version of the drawing surface
    pub const LEGACY_INIT: &str = "INIT_OSC";
    pub const LEGACY_ADD_NODE: &str = "ADD_OSC";
    pub const LEGACY_UPDATE_FREQUENCIES: &str = "UPDATE_OSCFRQ";
    pub const LEGACY_SUSPEND_CONTEXT: &str = "CTX_SUSPEND";
}

/// Fallbacks for fields an `ADD_NODE` payload may leave out.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefaults {
    pub channel: ChannelKey,
    pub frequency: f64,
}

impl Default for ActionDefaults {
    fn default() -> Self {
        Self {
            channel: ChannelKey::from("sine"),
            frequency: 440.0,
        }
    }
}

/// One `(channel, frequency)` pair of a frequency batch.
/// `freq` is `None` when the payload value was not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub channel: ChannelKey,
    pub freq: Option<f64>,
}

impl FrequencyEntry {
    pub fn new(channel: impl Into<ChannelKey>, freq: f64) -> Self {
        Self {
            channel: channel.into(),
            freq: Some(freq),
        }
    }
}

/// A decoded command for the mixer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Resume the audio context if needed and start every ready node.
    Init,
    AddNode {
        channel: ChannelKey,
        init_freq: f64,
    },
    UpdateFrequencies(Vec<FrequencyEntry>),
    SuspendContext,
    /// A selector widget was clicked. Carries no registry work.
    SelectWave {
        key: ChannelKey,
        wave: WaveKind,
        color: Rgba,
    },
}

/// Why a message could not be turned into an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    UnknownKind(String),
    MalformedPayload { kind: String, reason: String },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnknownKind(kind) => write!(f, "{} action not specified", kind),
            DecodeError::MalformedPayload { kind, reason } => {
                write!(f, "malformed {} payload: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Deserialize, Default)]
struct AddNodePayload {
    channel: Option<String>,
    #[serde(rename = "initFreq")]
    init_freq: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct SelectWavePayload {
    key: String,
    #[serde(rename = "waveType")]
    wave: WaveKind,
    #[serde(default)]
    rgba: Rgba,
}

impl Action {
    /// Build an `ADD_NODE`, filling absent fields from `defaults`.
    /// An empty channel key and a zero frequency count as absent.
    pub fn add_node(
        channel: Option<ChannelKey>,
        init_freq: Option<f64>,
        defaults: &ActionDefaults,
    ) -> Self {
        Action::AddNode {
            channel: channel
                .filter(|c| !c.as_str().is_empty())
                .unwrap_or_else(|| defaults.channel.clone()),
            init_freq: init_freq
                .filter(|f| *f != 0.0)
                .unwrap_or(defaults.frequency),
        }
    }

    /// Wire name of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Init => kind::INIT,
            Action::AddNode { .. } => kind::ADD_NODE,
            Action::UpdateFrequencies(_) => kind::UPDATE_FREQUENCIES,
            Action::SuspendContext => kind::SUSPEND_CONTEXT,
            Action::SelectWave { .. } => kind::SELECT_WAVE,
        }
    }

    pub fn decode(message: &Message, defaults: &ActionDefaults) -> Result<Self, DecodeError> {
        match message.kind.as_str() {
            kind::INIT | kind::LEGACY_INIT => Ok(Action::Init),
            kind::SUSPEND_CONTEXT | kind::LEGACY_SUSPEND_CONTEXT => Ok(Action::SuspendContext),
            kind::ADD_NODE | kind::LEGACY_ADD_NODE => {
                let payload: AddNodePayload = match &message.payload {
                    None | Some(Value::Null) => AddNodePayload::default(),
                    Some(value) => serde_json::from_value(value.clone())
                        .map_err(|e| malformed(&message.kind, e))?,
                };
                Ok(Action::add_node(
                    payload.channel.map(ChannelKey::from),
                    payload.init_freq,
                    defaults,
                ))
            }
            kind::UPDATE_FREQUENCIES | kind::LEGACY_UPDATE_FREQUENCIES => {
                let entries = match &message.payload {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Object(map)) => map
                        .iter()
                        .map(|(channel, freq)| FrequencyEntry {
                            channel: ChannelKey::from(channel.as_str()),
                            freq: freq.as_f64(),
                        })
                        .collect(),
                    Some(other) => {
                        return Err(malformed(
                            &message.kind,
                            format!("expected an object, got {}", other),
                        ))
                    }
                };
                Ok(Action::UpdateFrequencies(entries))
            }
            kind::SELECT_WAVE => {
                let value = message
                    .payload
                    .clone()
                    .ok_or_else(|| malformed(&message.kind, "missing payload"))?;
                let payload: SelectWavePayload =
                    serde_json::from_value(value).map_err(|e| malformed(&message.kind, e))?;
                Ok(Action::SelectWave {
                    key: ChannelKey::from(payload.key),
                    wave: payload.wave,
                    color: payload.rgba,
                })
            }
            other => Err(DecodeError::UnknownKind(other.to_string())),
        }
    }

    /// Encode back into a bus envelope using the current wire names.
    pub fn to_message(&self) -> Message {
        match self {
            Action::Init | Action::SuspendContext => Message::new(self.kind()),
            Action::AddNode { channel, init_freq } => Message::with_payload(
                self.kind(),
                json!({ "channel": channel.as_str(), "initFreq": init_freq }),
            ),
            Action::UpdateFrequencies(entries) => {
                let map: Map<String, Value> = entries
                    .iter()
                    .map(|e| (e.channel.to_string(), e.freq.map_or(Value::Null, Value::from)))
                    .collect();
                Message::with_payload(self.kind(), Value::Object(map))
            }
            Action::SelectWave { key, wave, color } => {
                let payload = SelectWavePayload {
                    key: key.to_string(),
                    wave: *wave,
                    rgba: *color,
                };
                Message::with_payload(
                    self.kind(),
                    serde_json::to_value(payload).unwrap_or(Value::Null),
                )
            }
        }
    }
}

fn malformed(kind: &str, reason: impl std::fmt::Display) -> DecodeError {
    DecodeError::MalformedPayload {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}
