//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ HttpServer ──▶ Forwarder ──▶ ServerPool::next_peer ──▶ Backend
//!                 │               │
//!                 │               └─ backend error / timeout ──▶ 503 "Service unavailable"
//!                 │
//!                 └─ lifecycle: Starting → Serving → ShuttingDown → Stopped
//! ```
//!
//! The pool is built once at startup and passed explicitly to the server and
//! the admin API; there is no global state.

// Core subsystems
pub mod config;
pub mod http;
pub mod load_balancer;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub mod mock_backend;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::ServerPool;
