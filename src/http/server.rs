//! HTTP server setup and serve loop.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all forwarding handler
//! - Wire up middleware (tracing)
//! - Serve connections until the shutdown signal
//! - Drain in-flight requests within the grace period

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::trace::TraceLayer;

use crate::config::BalancerConfig;
use crate::http::proxy::{proxy_handler, Forwarder};
use crate::lifecycle::shutdown::drain;
use crate::lifecycle::{LifecycleError, LifecycleState, ShutdownOutcome, StateHandle};
use crate::load_balancer::ServerPool;

/// HTTP front end of the load balancer.
pub struct HttpServer {
    router: Router,
    pool: Arc<ServerPool>,
    state: StateHandle,
    shutdown_grace: Duration,
}

impl HttpServer {
    /// Create a new HTTP server forwarding into `pool`.
    pub fn new(config: &BalancerConfig, pool: Arc<ServerPool>) -> Self {
        let forwarder = Arc::new(Forwarder::new(
            pool.clone(),
            config.timeouts.connect(),
            config.timeouts.backend(),
        ));

        Self {
            router: Self::build_router(forwarder),
            pool,
            state: StateHandle::new(),
            shutdown_grace: config.timeouts.shutdown_grace(),
        }
    }

    fn build_router(forwarder: Arc<Forwarder>) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(forwarder)
            .layer(TraceLayer::new_for_http())
    }

    /// Handle for observing the lifecycle state from other tasks.
    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain.
    ///
    /// After the signal no new connections are accepted. Requests already in
    /// flight get the configured grace period; if they are still running when
    /// it elapses the outcome is [`ShutdownOutcome::Forced`] and the caller
    /// owns what happens to those connections (the binary exits, dropping
    /// the runtime and them with it).
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<ShutdownOutcome, LifecycleError> {
        let addr = listener.local_addr()?;
        let (drain_tx, drain_rx) = oneshot::channel::<()>();

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = drain_rx.await;
        });
        let mut serving = tokio::spawn(async move { server.await });

        self.state.set(LifecycleState::Serving);
        tracing::info!(address = %addr, backends = self.pool.len(), "Load balancer serving");

        tokio::select! {
            // A closed channel means the coordinator is gone; stop as well.
            _ = shutdown.recv() => {}
            joined = &mut serving => {
                self.state.set(LifecycleState::Stopped);
                joined??;
                return Ok(ShutdownOutcome::Clean);
            }
        }

        self.state.set(LifecycleState::ShuttingDown);
        tracing::info!(grace = ?self.shutdown_grace, "Shutting down, draining in-flight requests");
        let _ = drain_tx.send(());

        let outcome = drain(serving, self.shutdown_grace).await;
        self.state.set(LifecycleState::Stopped);

        match &outcome {
            Ok(ShutdownOutcome::Clean) => tracing::info!("HTTP server stopped"),
            Ok(ShutdownOutcome::Forced { grace }) => tracing::warn!(
                grace = ?grace,
                "Grace period elapsed, no longer waiting for in-flight requests"
            ),
            Err(e) => tracing::error!(error = %e, "HTTP server failed during shutdown"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn server_over(backends: &[String]) -> HttpServer {
        let mut config = BalancerConfig::default();
        config.backends = backends.to_vec();
        config.timeouts.backend_secs = 1;
        let pool = Arc::new(ServerPool::new(backends).unwrap());
        HttpServer::new(&config, pool)
    }

    #[tokio::test]
    async fn test_any_method_and_path_reach_forwarder() {
        let dead = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap()
        };
        let server = server_over(&[format!("http://{}", dead)]);

        for (method, path) in [(Method::GET, "/"), (Method::DELETE, "/a/b?c=d")] {
            let req = Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap();
            let res = server.router.clone().oneshot(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[tokio::test]
    async fn test_empty_pool_answers_500() {
        let server = server_over(&[]);
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = server.router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(server.state().get(), LifecycleState::Starting);
    }
}
