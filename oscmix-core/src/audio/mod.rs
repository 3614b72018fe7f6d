//! Audio collaborator traits.
//!
//! The mixer never synthesizes sound itself. `AudioNode` captures what it
//! *means* to do with one oscillating voice (start it, mute it, move its
//! frequency) independently of how a backend produces audio. `AudioContext`
//! is the single process-wide clock/run-state handle all nodes share.

mod recording;

pub use recording::{ManualContext, NodeOp, RecordingLog, RecordingNode, RecordingNodeFactory};

use std::fmt;

use oscmix_types::{ContextState, WaveKind};

/// Result type for node operations.
pub type NodeResult<T = ()> = Result<T, NodeError>;

/// Error from a node operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeError(pub String);

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NodeError {}

impl From<String> for NodeError {
    fn from(s: String) -> Self {
        NodeError(s)
    }
}

/// Seconds on the audio context's clock.
pub type Timestamp = f64;

/// One oscillating voice, exclusively owned by a channel.
pub trait AudioNode {
    fn start(&mut self) -> NodeResult;

    fn started(&self) -> bool;

    fn mute(&mut self) -> NodeResult;

    fn unmute(&mut self) -> NodeResult;

    /// Ramp to `volume` starting at `at_time`.
    fn update_volume(&mut self, volume: f32, at_time: Timestamp) -> NodeResult;

    /// Glide to `frequency` (Hz) starting at `at_time`.
    fn update_freq(&mut self, frequency: f64, at_time: Timestamp) -> NodeResult;
}

/// Parameters for creating a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSettings {
    pub wave: WaveKind,
    /// Peak output level, also used as the initial level
    pub max_volume: f32,
    pub frequency: f64,
}

/// Builds nodes against the shared context.
pub trait NodeFactory {
    fn create(&self, context: &dyn AudioContext, settings: NodeSettings) -> Box<dyn AudioNode>;
}

/// Process-wide audio context. Only the dispatcher suspends or resumes it.
pub trait AudioContext {
    fn state(&self) -> ContextState;

    fn resume(&mut self);

    fn suspend(&mut self);

    fn current_time(&self) -> Timestamp;
}
