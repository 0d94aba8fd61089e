//! Round-robin rotation cursor.

use std::sync::atomic::{AtomicU64, Ordering};

/// Round-robin selector.
/// Stores an internal counter to rotate through backends.
///
/// The counter is incremented before it is read, so on a fresh cursor the
/// first index returned is `1 % len`, not `0`. Index 0 is reached only after
/// a full cycle. Existing deployments depend on this ordering.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicU64,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cursor and map it onto `0..len`.
    ///
    /// Returns `None` without advancing when `len` is zero.
    pub fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        Some((next % len as u64) as usize)
    }

    /// Number of selections made so far.
    pub fn position(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
