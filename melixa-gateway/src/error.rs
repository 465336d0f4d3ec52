//! Error types for melixa-gateway
//!
//! The gateway collapses every failure into a small fixed taxonomy:
//! client input errors (400), upstream unavailability (503), upstream
//! latency (408), and a generic 500 carrying the underlying message.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use melixa_common::api::ErrorResponse;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream /predict exceeded its timeout (408)
    #[error("Request timeout")]
    Timeout,

    /// Upload body over the configured limit (413)
    #[error("Upload too large")]
    PayloadTooLarge,

    /// Upstream ML service unreachable (503)
    #[error("ML service is unavailable")]
    Unavailable,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// melixa-common error
    #[error("Common error: {0}")]
    Common(#[from] melixa_common::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ApiError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorResponse::new("Request timeout"),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new("Audio file exceeds the upload size limit"),
            ),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("ML service is unavailable"),
            ),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Internal server error", err.to_string()),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Internal server error", err.to_string()),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Internal server error", msg),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unreachable => ApiError::Unavailable,
            UpstreamError::Timeout => ApiError::Timeout,
            UpstreamError::NotFound(_) => ApiError::NotFound("Audio file not found".to_string()),
            UpstreamError::Status(status, body) => {
                ApiError::Internal(format!("ML service returned {}: {}", status, body))
            }
            UpstreamError::Network(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(err.to_string())
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_unreachable_maps_to_503() {
        let err: ApiError = UpstreamError::Unreachable.into();
        assert!(matches!(err, ApiError::Unavailable));
    }

    #[test]
    fn upstream_timeout_maps_to_408() {
        let err: ApiError = UpstreamError::Timeout.into();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[test]
    fn upstream_status_maps_to_internal() {
        let err: ApiError = UpstreamError::Status(500, "model blew up".to_string()).into();
        match err {
            ApiError::Internal(msg) => assert!(msg.contains("model blew up")),
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
