//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → connect timeout (HttpConnector)
//!     → timeouts.rs (bound the wait for response headers)
//!     → On failure: caller answers 503, no retry
//! ```
//!
//! # Design Decisions
//! - Every backend call has a deadline
//! - No retries against another peer; a failing peer keeps its share

pub mod timeouts;
