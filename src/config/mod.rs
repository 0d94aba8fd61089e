//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides: PORT, LISTEN_ADDR, BACKENDS, ...
//!     → validation.rs (semantic checks, all errors reported together)
//!     → BalancerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend list only grows at runtime
//!   through the pool, never through the config
//! - All fields have defaults to allow running with no file at all
//! - Any configuration error is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    AdminConfig, BalancerConfig, ListenerConfig, LogFormat, ObservabilityConfig, TimeoutConfig,
};
pub use validation::{parse_backend_url, validate_config, ValidationError};
