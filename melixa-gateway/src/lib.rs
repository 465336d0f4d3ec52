//! melixa-gateway library interface for testing
//!
//! Exposes the application state and router builder so integration
//! tests can drive the gateway without spawning the binary.

pub mod api;
pub mod error;
pub mod spool;
pub mod upstream;

pub use crate::api::build_router;
pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use melixa_common::config::GatewayConfig;

use crate::upstream::MlServiceClient;

/// Application state shared across handlers
///
/// Handlers hold no mutable state: each request is an independent
/// forward to the upstream service.
#[derive(Clone)]
pub struct AppState {
    /// Resolved gateway configuration
    pub config: Arc<GatewayConfig>,
    /// HTTP client for the upstream ML service
    pub upstream: Arc<MlServiceClient>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let upstream = MlServiceClient::new(&config.ml_service_url, config.predict_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        })
    }
}
