//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_requests_total` (counter): forwarded requests by peer, status
//! - `lb_backend_failures_total` (counter): transport failures by peer
//! - `lb_request_duration_seconds` (histogram): time spent on the backend call
//! - `lb_pool_size` (gauge): number of backends in rotation

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a request relayed to `peer` (including the synthesized 503).
pub fn record_request(peer: &str, status: u16, start: Instant) {
    let peer = peer.to_string();
    metrics::counter!(
        "lb_requests_total",
        "peer" => peer.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("lb_request_duration_seconds", "peer" => peer)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_failure(peer: &str) {
    metrics::counter!("lb_backend_failures_total", "peer" => peer.to_string()).increment(1);
}

pub fn set_pool_size(len: usize) {
    metrics::gauge!("lb_pool_size").set(len as f64);
}
