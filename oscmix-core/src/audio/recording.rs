//! Recording audio collaborators.
//!
//! Nodes built by `RecordingNodeFactory` make no sound; they append every
//! call to a shared `RecordingLog` so tests (and the command-line dry run)
//! can assert on exactly what the mixer asked for. `ManualContext` is a
//! context whose clock only moves when told to.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use oscmix_types::{ContextState, WaveKind};

use super::{AudioContext, AudioNode, NodeFactory, NodeResult, NodeSettings, Timestamp};

/// An operation recorded by a `RecordingNode`. `node` is the creation index.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOp {
    Create {
        node: usize,
        wave: WaveKind,
        max_volume: f32,
        frequency: f64,
        at_time: Timestamp,
    },
    Start {
        node: usize,
    },
    Mute {
        node: usize,
    },
    Unmute {
        node: usize,
    },
    UpdateVolume {
        node: usize,
        volume: f32,
        at_time: Timestamp,
    },
    UpdateFreq {
        node: usize,
        frequency: f64,
        at_time: Timestamp,
    },
}

impl NodeOp {
    pub fn node(&self) -> usize {
        match self {
            NodeOp::Create { node, .. }
            | NodeOp::Start { node }
            | NodeOp::Mute { node }
            | NodeOp::Unmute { node }
            | NodeOp::UpdateVolume { node, .. }
            | NodeOp::UpdateFreq { node, .. } => *node,
        }
    }
}

/// Shared, append-only operation log.
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    ops: Rc<RefCell<Vec<NodeOp>>>,
}

impl RecordingLog {
    fn push(&self, op: NodeOp) {
        self.ops.borrow_mut().push(op);
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<NodeOp> {
        self.ops.borrow().clone()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Count operations matching a predicate.
    pub fn count<F: Fn(&NodeOp) -> bool>(&self, f: F) -> usize {
        self.ops.borrow().iter().filter(|op| f(op)).count()
    }

    pub fn nodes_created(&self) -> usize {
        self.count(|op| matches!(op, NodeOp::Create { .. }))
    }

    pub fn start_count(&self, node: usize) -> usize {
        self.count(|op| *op == NodeOp::Start { node })
    }

    /// Mute state as last set on the node. Nodes begin unmuted.
    pub fn is_muted(&self, node: usize) -> bool {
        self.ops
            .borrow()
            .iter()
            .rev()
            .find_map(|op| match op {
                NodeOp::Mute { node: n } if *n == node => Some(true),
                NodeOp::Unmute { node: n } if *n == node => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Most recent frequency the node was created with or moved to.
    pub fn frequency(&self, node: usize) -> Option<f64> {
        self.ops.borrow().iter().rev().find_map(|op| match op {
            NodeOp::UpdateFreq { node: n, frequency, .. } if *n == node => Some(*frequency),
            NodeOp::Create { node: n, frequency, .. } if *n == node => Some(*frequency),
            _ => None,
        })
    }

    /// Creation index of the node built with `wave`, if any.
    pub fn node_for_wave(&self, wave: WaveKind) -> Option<usize> {
        self.ops.borrow().iter().find_map(|op| match op {
            NodeOp::Create { node, wave: w, .. } if *w == wave => Some(*node),
            _ => None,
        })
    }
}

pub struct RecordingNode {
    index: usize,
    started: bool,
    log: RecordingLog,
}

impl AudioNode for RecordingNode {
    fn start(&mut self) -> NodeResult {
        self.started = true;
        self.log.push(NodeOp::Start { node: self.index });
        Ok(())
    }

    fn started(&self) -> bool {
        self.started
    }

    fn mute(&mut self) -> NodeResult {
        self.log.push(NodeOp::Mute { node: self.index });
        Ok(())
    }

    fn unmute(&mut self) -> NodeResult {
        self.log.push(NodeOp::Unmute { node: self.index });
        Ok(())
    }

    fn update_volume(&mut self, volume: f32, at_time: Timestamp) -> NodeResult {
        self.log.push(NodeOp::UpdateVolume {
            node: self.index,
            volume,
            at_time,
        });
        Ok(())
    }

    fn update_freq(&mut self, frequency: f64, at_time: Timestamp) -> NodeResult {
        self.log.push(NodeOp::UpdateFreq {
            node: self.index,
            frequency,
            at_time,
        });
        Ok(())
    }
}

/// Factory for `RecordingNode`s sharing one log.
#[derive(Default)]
pub struct RecordingNodeFactory {
    log: RecordingLog,
    next_index: Cell<usize>,
}

impl RecordingNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the log every node of this factory writes to.
    pub fn log(&self) -> RecordingLog {
        self.log.clone()
    }
}

impl NodeFactory for RecordingNodeFactory {
    fn create(&self, context: &dyn AudioContext, settings: NodeSettings) -> Box<dyn AudioNode> {
        let index = self.next_index.get();
        self.next_index.set(index + 1);
        self.log.push(NodeOp::Create {
            node: index,
            wave: settings.wave,
            max_volume: settings.max_volume,
            frequency: settings.frequency,
            at_time: context.current_time(),
        });
        Box::new(RecordingNode {
            index,
            started: false,
            log: self.log.clone(),
        })
    }
}

/// Audio context with a hand-driven clock. Clones share state, so a caller
/// can keep one to advance time after handing another to the mixer.
#[derive(Debug, Clone, Default)]
pub struct ManualContext {
    state: Rc<Cell<ContextState>>,
    now: Rc<Cell<Timestamp>>,
}

impl ManualContext {
    /// A suspended context at time zero, as browsers hand out before any user gesture.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running() -> Self {
        let ctx = Self::default();
        ctx.state.set(ContextState::Running);
        ctx
    }

    pub fn advance(&self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }
}

impl AudioContext for ManualContext {
    fn state(&self) -> ContextState {
        self.state.get()
    }

    fn resume(&mut self) {
        self.state.set(ContextState::Running);
    }

    fn suspend(&mut self) {
        self.state.set(ContextState::Suspended);
    }

    fn current_time(&self) -> Timestamp {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(wave: WaveKind) -> NodeSettings {
        NodeSettings {
            wave,
            max_volume: 0.04,
            frequency: 220.0,
        }
    }

    #[test]
    fn nodes_get_sequential_indices() {
        let ctx = ManualContext::new();
        let factory = RecordingNodeFactory::new();
        let _a = factory.create(&ctx, settings(WaveKind::Sine));
        let _b = factory.create(&ctx, settings(WaveKind::Square));
        let log = factory.log();
        assert_eq!(log.nodes_created(), 2);
        assert_eq!(log.node_for_wave(WaveKind::Square), Some(1));
    }

    #[test]
    fn mute_state_follows_last_call() {
        let ctx = ManualContext::new();
        let factory = RecordingNodeFactory::new();
        let mut node = factory.create(&ctx, settings(WaveKind::Sine));
        let log = factory.log();
        assert!(!log.is_muted(0));
        node.mute().unwrap();
        assert!(log.is_muted(0));
        node.unmute().unwrap();
        assert!(!log.is_muted(0));
    }

    #[test]
    fn manual_clock_only_moves_forward() {
        let ctx = ManualContext::new();
        let handle = ctx.clone();
        handle.advance(1.5);
        handle.advance(-3.0);
        assert!((ctx.current_time() - 1.5).abs() < f64::EPSILON);
        assert_eq!(ctx.state(), ContextState::Suspended);
    }
}
