//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use rr_balancer::config::BalancerConfig;
use rr_balancer::lifecycle::{startup, LifecycleError, ShutdownOutcome, StateHandle};
use rr_balancer::{mock_backend, HttpServer, ServerPool, Shutdown};
use tokio::task::JoinHandle;

#[allow(dead_code)]
async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start an echo backend whose body names its own port.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = mock_backend::router(addr.port().to_string());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a backend that waits `delay` before answering "slow".
#[allow(dead_code)]
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let router = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "slow"
    });
    spawn_router(router).await
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub fn unused_addr() -> SocketAddr {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    l.local_addr().unwrap()
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// A running balancer on an ephemeral port.
#[allow(dead_code)]
pub struct TestBalancer {
    pub addr: SocketAddr,
    pub pool: Arc<ServerPool>,
    pub state: StateHandle,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<ShutdownOutcome, LifecycleError>>,
}

impl TestBalancer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a balancer over `backends`, letting the caller adjust the config.
pub async fn start_balancer<F>(backends: Vec<String>, tweak: F) -> TestBalancer
where
    F: FnOnce(&mut BalancerConfig),
{
    let mut config = BalancerConfig::default();
    config.backends = backends;
    config.timeouts.backend_secs = 2;
    tweak(&mut config);

    let pool = Arc::new(ServerPool::new(config.backends.as_slice()).unwrap());
    let listener = startup::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config, pool.clone());
    let state = server.state();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestBalancer {
        addr,
        pool,
        state,
        shutdown,
        handle,
    }
}

/// Client without idle pooling so each request opens a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
