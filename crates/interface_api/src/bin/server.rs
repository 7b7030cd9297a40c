//! Insurance API Server Binary
//!
//! Starts the HTTP API for the product, policy, payment and claim services.
//!
//! # Usage
//!
//! ```bash
//! # Run everything in-process with in-memory storage
//! cargo run --bin insurance-api
//!
//! # Run against PostgreSQL with a remote payment service
//! API_DATABASE__URL=postgres://... API_PEERS__PAYMENT_URL=http://payments:8083 cargo run --bin insurance-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_SERVER__HOST` / `API_SERVER__PORT` - Listen address (default: 0.0.0.0:8080)
//! * `API_SERVER__LOG_LEVEL` - Filter used when `RUST_LOG` is unset (default: info)
//! * `API_SERVER__LOG_FORMAT` - `pretty` or `json`
//! * `API_DATABASE__URL` - PostgreSQL connection string; in-memory storage when unset
//! * `API_PEERS__PRODUCT_URL`, `API_PEERS__POLICY_URL`, `API_PEERS__PAYMENT_URL` - Remote peers
//! * `API_RESILIENCE__*` - Circuit breaker settings

use anyhow::Context;
use interface_api::config::{ApiConfig, LogFormat, ServerConfig};
use interface_api::{create_router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::load().context("failed to load configuration")?;

    init_tracing(&config.server);

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = config.database.is_some(),
        "Starting insurance API server"
    );

    let state = AppState::from_config(&config)
        .await
        .context("failed to wire services")?;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
