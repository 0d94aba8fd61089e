//! Process lifecycle state.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting = 0,
    Serving = 1,
    ShuttingDown = 2,
    Stopped = 3,
}

impl From<u8> for LifecycleState {
    fn from(val: u8) -> Self {
        match val {
            1 => LifecycleState::Serving,
            2 => LifecycleState::ShuttingDown,
            3 => LifecycleState::Stopped,
            _ => LifecycleState::Starting,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Serving => "serving",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Shared, cheaply cloneable view of the current lifecycle state.
#[derive(Debug, Clone, Default)]
pub struct StateHandle(Arc<AtomicU8>);

impl StateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LifecycleState {
        LifecycleState::from(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, next: LifecycleState) {
        let prev = LifecycleState::from(self.0.swap(next as u8, Ordering::AcqRel));
        if prev != next {
            tracing::debug!(from = %prev, to = %next, "Lifecycle transition");
        }
    }
}
