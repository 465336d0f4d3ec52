//! MELIXA API Gateway - Main entry point
//!
//! HTTP gateway fronting the external ML inference service for the
//! MELIXA music-mood application: multipart upload forwarding, audio
//! streaming relay, and verbatim JSON passthrough.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use melixa_common::config::{ConfigOverrides, GatewayConfig};
use melixa_gateway::AppState;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for melixa-gateway
#[derive(Parser, Debug)]
#[command(name = "melixa-gateway")]
#[command(about = "API gateway for the MELIXA music-mood application")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL of the ML inference service
    #[arg(short, long)]
    ml_service_url: Option<String>,

    /// Directory for spooling audio uploads
    #[arg(short, long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melixa_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = GatewayConfig::resolve(ConfigOverrides {
        port: args.port,
        ml_service_url: args.ml_service_url,
        upload_dir: args.upload_dir,
    });

    info!("Starting MELIXA API Gateway on port {}", config.port);
    info!("ML service URL: {}", config.ml_service_url);
    info!("Upload spool dir: {}", config.upload_dir.display());

    config
        .ensure_upload_dir()
        .context("Failed to create upload spool directory")?;

    let port = config.port;
    let state = AppState::new(config).context("Failed to initialize upstream client")?;

    let app = melixa_gateway::build_router(state);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
