//! Dispatch abstraction.

use crate::Action;

/// Trait for dispatching actions to the mixer.
///
/// The bus-facing side of the mixer only sees this trait, so a test double
/// can stand in for the real channel registry.
pub trait Dispatcher {
    /// Dispatch an action and return what it changed.
    fn dispatch(&mut self, action: &Action) -> DispatchResult;
}

/// Summary of the node operations one dispatch performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// Node operations that were carried out
    pub applied: usize,
    /// Requested operations skipped (unknown channel, no node, bad value)
    pub skipped: usize,
    /// The audio context was resumed or suspended
    pub context_changed: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn applied(applied: usize) -> Self {
        Self {
            applied,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.context_changed |= other.context_changed;
    }

    /// Nothing happened at all.
    pub fn is_noop(&self) -> bool {
        self.applied == 0 && !self.context_changed
    }
}
