//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the ordered list of backend targets
//! - Hand out the next target in round-robin order
//! - Accept new targets at runtime without blocking selection

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::config::ValidationError;
use crate::load_balancer::{backend::Backend, round_robin::RoundRobin};
use crate::observability::metrics;

/// Errors raised by the server pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A backend address could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),

    /// Selection was attempted on a pool with no backends.
    #[error("server pool is empty")]
    Empty,
}

/// Ordered set of backends with a shared rotation cursor.
///
/// Readers load the current list as one immutable snapshot, so a selection
/// always sees a list length and contents that belong together. `add_peer`
/// publishes a new snapshot instead of mutating in place.
#[derive(Debug)]
pub struct ServerPool {
    backends: ArcSwap<Vec<Arc<Backend>>>,
    cursor: RoundRobin,
}

impl ServerPool {
    /// Build a pool from backend addresses, in rotation order.
    ///
    /// Fails on the first malformed address; nothing is selectable until
    /// every address has parsed.
    pub fn new<S: AsRef<str>>(addresses: &[S]) -> Result<Self, PoolError> {
        let backends = addresses
            .iter()
            .map(|a| Backend::parse(a.as_ref()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        metrics::set_pool_size(backends.len());
        tracing::debug!(backend_count = backends.len(), "Server pool created");

        Ok(Self {
            backends: ArcSwap::from_pointee(backends),
            cursor: RoundRobin::new(),
        })
    }

    /// Parse `address` and append it to the rotation.
    ///
    /// Safe to call while other tasks are selecting peers. Returns the new
    /// pool size.
    pub fn add_peer(&self, address: &str) -> Result<usize, PoolError> {
        let backend = Arc::new(Backend::parse(address)?);

        let previous = self.backends.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(backend.clone());
            next
        });
        let len = previous.len() + 1;

        metrics::set_pool_size(len);
        tracing::info!(peer = %backend.authority(), pool_size = len, "Peer added");
        Ok(len)
    }

    /// Select the next backend.
    ///
    /// The cursor is advanced before indexing, so the first call on a fresh
    /// pool returns the backend at index 1 (index 0 when the pool has one
    /// entry). After an `add_peer` the new length applies from the very next
    /// call.
    pub fn next_peer(&self) -> Result<Arc<Backend>, PoolError> {
        let backends = self.backends.load();
        let index = self
            .cursor
            .next_index(backends.len())
            .ok_or(PoolError::Empty)?;
        Ok(backends[index].clone())
    }

    /// Current backend snapshot, in rotation order.
    pub fn peers(&self) -> Arc<Vec<Arc<Backend>>> {
        self.backends.load_full()
    }

    pub fn len(&self) -> usize {
        self.backends.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
