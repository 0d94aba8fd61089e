//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BalancerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file. Does not validate.
pub fn load_file(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` is usually `std::env::var(..).ok()`; tests pass a map instead.
pub fn apply_env<F>(config: &mut BalancerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: "PORT",
            value: port.clone(),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    // A full address wins over a bare port.
    if let Some(addr) = lookup("LISTEN_ADDR") {
        config.listener.bind_address = addr.trim().to_string();
    }

    if let Some(list) = lookup("BACKENDS") {
        config.backends = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(secs) = lookup("BACKEND_TIMEOUT_SECS") {
        config.timeouts.backend_secs = parse_secs("BACKEND_TIMEOUT_SECS", &secs)?;
    }
    if let Some(secs) = lookup("SHUTDOWN_GRACE_SECS") {
        config.timeouts.shutdown_grace_secs = parse_secs("SHUTDOWN_GRACE_SECS", &secs)?;
    }

    Ok(())
}

fn parse_secs(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

/// Load defaults, then the optional file, then the process environment, and validate.
pub fn load(path: Option<&Path>) -> Result<BalancerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => BalancerConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
