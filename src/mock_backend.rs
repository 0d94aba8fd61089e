//! Echo backend used for demos and integration tests.
//!
//! Answers every path and method with 200 and a body naming the port it was
//! started for, so callers can tell which instance served them.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Router};

/// Body served by the backend labelled `port`.
pub fn greeting(port: &str) -> String {
    format!("Request from service on port {}\n", port)
}

pub fn router(port: impl Into<String>) -> Router {
    let port: Arc<str> = Arc::from(port.into());
    Router::new().fallback(echo).with_state(port)
}

async fn echo(State(port): State<Arc<str>>, body: Bytes) -> String {
    tracing::info!(
        port = %port,
        body = %String::from_utf8_lossy(&body),
        "Service received request"
    );
    greeting(&port)
}
