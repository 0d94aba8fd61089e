//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend URLs must be absolute `http`/`https` URLs with a host
//! - Listen addresses must parse as socket addresses
//! - Timeouts must be non-zero
//! - An enabled admin API needs a real key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::BalancerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend list is empty")]
    EmptyBackendList,

    #[error("invalid backend URL {address:?}: {reason}")]
    InvalidBackendUrl { address: String, reason: String },

    #[error("invalid {field} {address:?}: {reason}")]
    InvalidSocketAddress {
        field: &'static str,
        address: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("admin API is enabled but admin.api_key is empty or the placeholder")]
    InsecureAdminKey,
}

/// Shipped default for `admin.api_key`; refused when the admin API is on.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Parse a backend address into a URL the forwarder can target.
///
/// The scheme must be `http` or `https` and a host must be present. A port
/// is optional and defaults to the scheme's well-known port.
pub fn parse_backend_url(address: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidBackendUrl {
        address: address.to_string(),
        reason,
    };

    let url = Url::parse(address.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(invalid("missing host".to_string())),
    }

    Ok(url)
}

fn check_socket_addr(
    field: &'static str,
    address: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Err(e) = address.parse::<SocketAddr>() {
        errors.push(ValidationError::InvalidSocketAddress {
            field,
            address: address.to_string(),
            reason: e.to_string(),
        });
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::EmptyBackendList);
    }
    for address in &config.backends {
        if let Err(e) = parse_backend_url(address) {
            errors.push(e);
        }
    }

    check_socket_addr("listen address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_socket_addr("metrics address", &config.observability.metrics_address, &mut errors);
    }
    if config.admin.enabled {
        check_socket_addr("admin address", &config.admin.bind_address, &mut errors);
        let key = config.admin.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_ADMIN_KEY {
            errors.push(ValidationError::InsecureAdminKey);
        }
    }

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.backend_secs", config.timeouts.backend_secs),
        ("timeouts.shutdown_grace_secs", config.timeouts.shutdown_grace_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
