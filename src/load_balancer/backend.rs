//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server by its parsed URL
//! - Pre-compute the authority used for URI and Host rewriting

use std::fmt;

use url::Url;

use crate::config::{parse_backend_url, ValidationError};

/// A single backend target. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// The parsed base URL of the backend.
    url: Url,
    /// Pre-calculated `host[:port]` for request rewriting and logs.
    authority: String,
}

impl Backend {
    /// Parse and validate a backend address such as `http://localhost:8081`
    /// or `https://api.internal:8443`.
    pub fn parse(address: &str) -> Result<Self, ValidationError> {
        parse_backend_url(address).map(Self::from_url)
    }

    fn from_url(url: Url) -> Self {
        let host = url.host_str().unwrap_or_default();
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Self { url, authority }
    }

    /// The full backend URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// `host[:port]`, the identity used in logs and metrics.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Path prefix configured on the backend URL ("/" when none).
    pub fn base_path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
