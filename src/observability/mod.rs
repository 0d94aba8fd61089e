//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pool / proxy handler / lifecycle produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every forward is logged with the chosen peer's authority
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
