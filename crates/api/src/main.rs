//! Newsroom API server
//!
//! Startup order: environment, configuration, tracing, metrics, database
//! pool, router. The pool is closed after the server drains on shutdown.

use metrics_exporter_prometheus::PrometheusBuilder;
use newsroom_api::{create_router, AppState};
use newsroom_common::{
    config::{AppConfig, ObservabilityConfig},
    db::DbPool,
    metrics,
};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        version = newsroom_common::VERSION,
        "Starting Newsroom API"
    );

    // Initialize metrics
    metrics::register_metrics();
    install_metrics_exporter(&config.observability)?;

    // Initialize database connection
    let db = DbPool::new(&config.database).await?;

    let state = AppState::new(db.clone());
    let app = create_router(state);

    // Start the server
    let addr = config.bind_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match tokio::time::timeout(config.shutdown_timeout(), db.close()).await {
        Ok(result) => result?,
        Err(_) => warn!("Timed out closing database connections"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber; RUST_LOG overrides the configured level
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Serve Prometheus metrics when a metrics port is configured
fn install_metrics_exporter(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.metrics_port == 0 {
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(metrics::LATENCY_BUCKETS)?
        .install()?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
