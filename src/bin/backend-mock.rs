//! Mock echo backend.
//!
//! Listens on `0.0.0.0:$SERVER_PORT` (default 8080) and answers every request
//! with a body naming that port.

use std::net::SocketAddr;

use rr_balancer::config::ObservabilityConfig;
use rr_balancer::lifecycle::signals;
use rr_balancer::mock_backend;
use rr_balancer::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&ObservabilityConfig::default())?;

    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting mini server");

    axum::serve(listener, mock_backend::router(port))
        .with_graceful_shutdown(signals::shutdown_signal())
        .await?;

    Ok(())
}
