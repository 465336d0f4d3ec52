//! Shared API request/response types
//!
//! Wire types used by the gateway and its integration tests. The ML
//! service payloads themselves (mood, confidence, recommendations) are
//! deliberately NOT modeled here: the gateway relays them as opaque
//! bytes and must not re-shape or re-order them.

use serde::{Deserialize, Serialize};

/// GET /health response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status ("ok" when the gateway is accepting requests)
    pub status: String,
    /// Current time, RFC 3339 UTC
    pub timestamp: String,
}

/// Error response body used by every gateway error path
///
/// Matches the wire format the frontend already consumes:
/// `{"error": "...", "details": "..."}` with `details` omitted when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, stable error message (e.g. "ML service is unavailable")
    pub error: String,
    /// Underlying cause, attached only to generic 500 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
