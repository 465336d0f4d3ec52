//! HTTP API for the gateway
//!
//! Route table mirrors the surface the frontend consumes: health check,
//! prediction upload proxy, DEAM audio streaming, and the two
//! informational passthrough endpoints.

pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Build the gateway router
pub fn build_router(state: AppState) -> Router {
    // The browser SPA is served from a different origin in development,
    // so CORS stays wide open, matching the frontend's expectations.
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/deam_audio/:filename", get(handlers::stream_deam_audio))
        .route("/api/info", get(handlers::get_info))
        .route("/api/deam-info", get(handlers::get_deam_info))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
