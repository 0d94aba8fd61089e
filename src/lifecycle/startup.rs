//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind listeners before any traffic is accepted
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::lifecycle::LifecycleError;

/// Bind a TCP listener on `address`.
pub async fn bind(address: &str) -> Result<TcpListener, LifecycleError> {
    let bind_error = |source| LifecycleError::Bind {
        address: address.to_string(),
        source,
    };

    let addr: SocketAddr = address
        .parse()
        .map_err(|e| bind_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

    let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_in_use() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let err = bind(&taken).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Bind { ref address, .. } if *address == taken));
    }

    #[tokio::test]
    async fn test_bind_unparsable() {
        let err = bind("localhost").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Bind { .. }));
    }
}
