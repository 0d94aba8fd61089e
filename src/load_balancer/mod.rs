//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (load current backend snapshot)
//!     → round_robin.rs (advance shared cursor, pick index)
//!     → backend.rs (parsed target: scheme, authority, base path)
//!     → Return target or PoolError::Empty
//! ```
//!
//! # Design Decisions
//! - The backend list is an immutable snapshot swapped atomically on AddPeer
//! - The cursor is a single atomic counter; selection takes no lock
//! - Backends are never removed, so there is no deregistration path

pub mod backend;
pub mod pool;
pub mod round_robin;

pub use backend::Backend;
pub use pool::{PoolError, ServerPool};
pub use round_robin::RoundRobin;
