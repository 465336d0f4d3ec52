//! Test helpers for gateway integration tests
//!
//! Spins up the gateway and a mock ML upstream on ephemeral ports so
//! tests exercise the real proxy path over HTTP.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::Router;
use melixa_common::config::GatewayConfig;
use melixa_gateway::{build_router, AppState};

/// Bind a router to an ephemeral port and serve it in the background.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Gateway configuration pointed at a test upstream, with a short
/// predict timeout so latency tests stay fast.
pub fn test_config(ml_service_url: String, upload_dir: &Path) -> GatewayConfig {
    GatewayConfig {
        port: 0,
        ml_service_url,
        upload_dir: upload_dir.to_path_buf(),
        predict_timeout: Duration::from_millis(500),
        max_upload_bytes: 100 * 1024 * 1024,
    }
}

/// Start a gateway instance proxying to `ml_service_url`.
pub async fn spawn_gateway(ml_service_url: String, upload_dir: &Path) -> SocketAddr {
    let state = AppState::new(test_config(ml_service_url, upload_dir)).unwrap();
    spawn_server(build_router(state)).await
}

/// Multipart form with an `audio` file field, as the frontend sends it.
pub fn audio_form(bytes: &'static [u8], filename: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
    reqwest::multipart::Form::new().part("audio", part)
}

/// Number of files currently sitting in the spool directory.
pub fn spool_entries(upload_dir: &Path) -> usize {
    std::fs::read_dir(upload_dir).unwrap().count()
}
