//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build pool → Bind listener (fatal on failure)
//!
//! Serving (http/server.rs):
//!     Accept loop, one task per connection
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain up to grace period → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - States: Starting → Serving → ShuttingDown → Stopped
//! - Shutdown has timeout: once the grace period elapses the server stops
//!   waiting (forced cutoff); open connections end when the process exits,
//!   which is logged but still exits 0
//! - The shutdown trigger is injectable so tests do not need OS signals

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

use thiserror::Error;

pub use shutdown::{Shutdown, ShutdownOutcome};
pub use state::{LifecycleState, StateHandle};

/// Fatal lifecycle errors. Each maps to a non-zero process exit.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Listener could not be bound (address in use, permission denied, ...).
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop or the listening socket failed.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
