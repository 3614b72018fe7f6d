//! Audio-related types shared across crates.

use serde::{Deserialize, Serialize};

/// Peak volume handed to every node at creation (and used as its initial level).
pub const MAX_NODE_VOLUME: f32 = 0.2 * 0.2;

/// Oscillator wave shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl WaveKind {
    pub const ALL: [WaveKind; 4] = [
        WaveKind::Sine,
        WaveKind::Triangle,
        WaveKind::Square,
        WaveKind::Sawtooth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaveKind::Sine => "sine",
            WaveKind::Triangle => "triangle",
            WaveKind::Square => "square",
            WaveKind::Sawtooth => "sawtooth",
        }
    }

    /// Parse a wave name. Accepts the short forms used by older configs.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(WaveKind::Sine),
            "triangle" | "tri" => Some(WaveKind::Triangle),
            "square" | "squ" => Some(WaveKind::Square),
            "sawtooth" | "saw" => Some(WaveKind::Sawtooth),
            _ => None,
        }
    }
}

impl std::fmt::Display for WaveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio context run state. Only these two states drive dispatcher behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContextState {
    #[default]
    Suspended,
    Running,
}

/// Informational mirror of a channel's audio settings.
/// The node itself is authoritative for what is actually audible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioAttrs {
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioAttrs {
    fn default() -> Self {
        Self {
            volume: 0.2,
            muted: true,
        }
    }
}

/// Where a channel's node is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeLifecycle {
    /// No node has been added yet
    Uninitialized,
    /// Node created but not started
    Ready,
    /// Node started (terminal)
    Started,
}

/// Widget palette color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        // Mixer strip orange
        Self::opaque(255, 161, 68)
    }
}
