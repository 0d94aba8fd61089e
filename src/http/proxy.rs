//! Request forwarding.
//!
//! # Responsibilities
//! - Ask the pool for the next peer
//! - Rewrite the request onto that peer (scheme, authority, path prefix, Host)
//! - Relay the backend response, or answer 503 when the backend fails
//!
//! A failing peer is not skipped or retried; it keeps receiving its share.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, Uri, Version},
    response::Response,
};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::http::response;
use crate::load_balancer::{Backend, ServerPool};
use crate::observability::metrics;
use crate::resilience::timeouts::{self, TimeoutError};

/// Why a request could not be relayed to its backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The peer address could not be turned into a request target.
    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),

    /// Connection refused, reset, or any other transport failure.
    #[error("backend unavailable: {0}")]
    Unavailable(#[from] hyper_util::client::legacy::Error),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

/// Forwards inbound requests to peers chosen from a shared pool.
#[derive(Clone)]
pub struct Forwarder {
    pool: Arc<ServerPool>,
    client: Client<HttpsConnector<HttpConnector>, Body>,
    backend_timeout: Duration,
}

/// Connector for `http` and `https` peers. TLS trusts the platform roots.
fn https_connector(connect_timeout: Duration) -> HttpsConnector<HttpConnector> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut http = HttpConnector::new();
    http.set_connect_timeout(Some(connect_timeout));
    http.enforce_http(false);

    let mut roots = rustls::RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for cert in native.certs {
        if roots.add(cert).is_err() {
            tracing::warn!("Skipping unusable native root certificate");
        }
    }
    if !native.errors.is_empty() {
        tracing::warn!(errors = ?native.errors, "Some native root certificates failed to load");
    }

    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .wrap_connector(http)
}

impl Forwarder {
    pub fn new(pool: Arc<ServerPool>, connect_timeout: Duration, backend_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(https_connector(connect_timeout));

        Self {
            pool,
            client,
            backend_timeout,
        }
    }

    /// Relay one request. Never fails: backend errors become a 503 and an
    /// empty pool becomes a 500.
    pub async fn forward(&self, request: Request) -> Response {
        let start = Instant::now();

        let peer = match self.pool.next_peer() {
            Ok(peer) => peer,
            Err(e) => {
                tracing::error!(error = %e, "No peer available");
                return response::internal_error();
            }
        };

        tracing::info!(
            peer = %peer.authority(),
            method = %request.method(),
            path = %request.uri().path(),
            "Forwarding request"
        );

        match self.send(&peer, request).await {
            Ok(res) => {
                metrics::record_request(peer.authority(), res.status().as_u16(), start);
                res
            }
            Err(e) => {
                tracing::warn!(peer = %peer.authority(), error = %e, "connection failed");
                metrics::record_backend_failure(peer.authority());
                metrics::record_request(peer.authority(), 503, start);
                response::service_unavailable()
            }
        }
    }

    async fn send(&self, peer: &Backend, request: Request) -> Result<Response, ForwardError> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let (mut parts, body) = request.into_parts();

        parts.uri = upstream_uri(peer, &parts.uri)?;
        // The pooled client negotiates HTTP/1.1 with backends regardless of
        // what the client spoke to us.
        parts.version = Version::HTTP_11;

        response::strip_hop_by_hop(&mut parts.headers);
        let host = HeaderValue::from_str(peer.authority())
            .map_err(|e| ForwardError::InvalidTarget(e.to_string()))?;
        parts.headers.insert(header::HOST, host);
        if let Some(ip) = client_ip {
            response::append_forwarded_for(&mut parts.headers, ip);
        }

        let outbound = Request::from_parts(parts, body);
        let res = timeouts::deadline(self.backend_timeout, self.client.request(outbound)).await??;

        let (mut parts, body) = res.into_parts();
        response::strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Axum handler: every method and path lands here.
pub async fn proxy_handler(State(forwarder): State<Arc<Forwarder>>, request: Request) -> Response {
    forwarder.forward(request).await
}

/// Build the backend URI: peer scheme and authority, peer base path joined
/// with the request path, request query unchanged.
pub fn upstream_uri(peer: &Backend, original: &Uri) -> Result<Uri, ForwardError> {
    let mut path_and_query = join_paths(peer.base_path(), original.path());
    if let Some(query) = original.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    Uri::builder()
        .scheme(peer.scheme())
        .authority(peer.authority())
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| ForwardError::InvalidTarget(e.to_string()))
}

/// Join two path segments with exactly one slash between them.
pub fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}
