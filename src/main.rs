//! Round-robin HTTP load balancer.
//!
//! Reads configuration (optional TOML file, then `PORT`, `LISTEN_ADDR`,
//! `BACKENDS`, ... from the environment), binds the listener, forwards every
//! request to the next backend in rotation, and shuts down gracefully on
//! SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use rr_balancer::admin::{self, AdminState};
use rr_balancer::config::{self, ObservabilityConfig};
use rr_balancer::lifecycle::{signals, startup, Shutdown, ShutdownOutcome};
use rr_balancer::observability::{logging, metrics};
use rr_balancer::{HttpServer, ServerPool};

#[derive(Parser, Debug)]
#[command(name = "rr-balancer", version, about = "Round-robin HTTP load balancer")]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "LB_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability)?;
    tracing::info!("rr-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    let pool = Arc::new(ServerPool::new(config.backends.as_slice())?);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = ?config.backends,
        backend_timeout_secs = config.timeouts.backend_secs,
        shutdown_grace_secs = config.timeouts.shutdown_grace_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = match startup::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, pool.clone());

    let admin_task = if config.admin.enabled {
        let admin_listener = startup::bind(&config.admin.bind_address).await?;
        let state = AdminState {
            pool: pool.clone(),
            lifecycle: server.state(),
            api_key: Arc::from(config.admin.api_key.as_str()),
        };
        Some(tokio::spawn(admin::serve(
            admin_listener,
            state,
            shutdown.subscribe(),
        )))
    } else {
        None
    };

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let outcome = server.run(listener, server_shutdown).await?;

    if let Some(task) = admin_task {
        match task.await {
            Ok(Err(e)) => tracing::warn!(error = %e, "Admin API exited with error"),
            Err(e) => tracing::warn!(error = %e, "Admin API task failed"),
            Ok(Ok(())) => {}
        }
    }

    match outcome {
        ShutdownOutcome::Clean => tracing::info!("Shutdown complete"),
        ShutdownOutcome::Forced { grace } => {
            tracing::warn!(grace = ?grace, "Shutdown complete (forced cutoff)")
        }
    }
    Ok(())
}
