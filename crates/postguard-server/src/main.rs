//! PostGuard Server
//!
//! Screens posts against an ordered list of hosted classification models
//! before they are published.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use postguard_core::Credential;
use postguard_server::cli::Cli;
use postguard_server::{create_router, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting PostGuard moderation server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Moderation models: {}", config.screening.models.len());
    info!(
        "Model call timeout: {}s (connect {}s)",
        config.screening.request_timeout_secs, config.screening.connect_timeout_secs
    );

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let credential = cli.api_key.clone().and_then(Credential::new);
    let state = AppState::new(&config, credential, metrics_handle)?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("postguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "postguard_requests_total",
        "Total number of moderation requests received"
    );
    metrics::describe_counter!(
        "postguard_screenings_total",
        "Screening runs by verdict (approved, rejected, failed)"
    );
    metrics::describe_counter!(
        "postguard_model_calls_total",
        "Model calls by model and outcome"
    );
    metrics::describe_histogram!(
        "postguard_screening_latency_us",
        metrics::Unit::Microseconds,
        "Screening latency in microseconds"
    );
    metrics::describe_counter!("postguard_errors_total", "Total number of failed moderation requests");

    info!("Metrics exporter initialized");
    Ok(handle)
}
