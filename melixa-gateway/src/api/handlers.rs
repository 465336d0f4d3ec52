//! HTTP request handlers
//!
//! Every handler is a single-hop forward to the upstream ML service;
//! the gateway adds no interpretation of the payloads it relays.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use melixa_common::api::{ErrorResponse, HealthResponse};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::spool::SpooledUpload;
use crate::AppState;

/// GET /health - Health check endpoint
///
/// Reports only the gateway's own liveness; never touches upstream.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// POST /predict - Forward an audio upload to the ML service
///
/// Accepts a multipart form with an `audio` field, spools it to disk,
/// forwards it upstream, and relays the prediction JSON verbatim.
/// The spooled file is removed on every exit path.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("audio") {
            continue;
        }

        let original_filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload.bin".to_string());

        let (spool, mut file) = SpooledUpload::create(&state.config.upload_dir).await?;

        let mut spooled_bytes: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            spooled_bytes += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        info!(
            filename = %original_filename,
            bytes = spooled_bytes,
            "Forwarding audio upload to ML service"
        );

        let body = spool.streaming_body().await?;
        let prediction = state.upstream.predict(body, original_filename).await?;

        // `spool` drops here, removing the temporary file.
        return Ok(([(header::CONTENT_TYPE, "application/json")], prediction));
    }

    Err(ApiError::BadRequest("No audio file provided".to_string()))
}

/// GET /deam_audio/:filename - Stream DEAM audio from the ML service
pub async fn stream_deam_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let stream = state.upstream.stream_audio(&filename).await.map_err(|e| {
        error!("Audio streaming error for {}: {}", filename, e);
        ApiError::from(e)
    })?;

    let mut response = Body::from_stream(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok(response)
}

/// GET /api/info - Relay upstream model info verbatim
pub async fn get_info(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    match state.upstream.fetch_info().await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body)),
        Err(e) => {
            error!("Info endpoint error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch info")),
            ))
        }
    }
}

/// GET /api/deam-info - Relay upstream DEAM dataset info verbatim
pub async fn get_deam_info(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    match state.upstream.fetch_deam_info().await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body)),
        Err(e) => {
            error!("DEAM info endpoint error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch DEAM info")),
            ))
        }
    }
}
