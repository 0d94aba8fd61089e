//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, serve loop, graceful drain)
//!     → proxy.rs (pick peer, rewrite, forward with deadline)
//!     → response.rs (strip hop-by-hop headers, 503/500 bodies)
//!     → Send to client
//! ```

pub mod proxy;
pub mod response;
pub mod server;

pub use proxy::{ForwardError, Forwarder};
pub use server::HttpServer;
