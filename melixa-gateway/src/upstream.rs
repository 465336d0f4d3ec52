//! ML inference service client
//!
//! Thin reqwest wrapper owning the upstream base URL. The gateway never
//! interprets prediction payloads; every JSON-returning call hands back
//! the raw upstream bytes so responses are relayed verbatim.

use bytes::Bytes;
use futures::Stream;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Upstream transport errors
///
/// Exactly the classes the HTTP layer distinguishes: unreachable (503),
/// timed out (408), not found (404, audio streaming only), and the
/// catch-all pair that collapses to 500.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused or host unreachable
    #[error("ML service is unreachable")]
    Unreachable,

    /// Request exceeded the configured timeout
    #[error("ML service request timed out")]
    Timeout,

    /// Upstream reported the resource missing
    #[error("Not found upstream: {0}")]
    NotFound(String),

    /// Upstream answered with a non-success status
    #[error("ML service returned {0}: {1}")]
    Status(u16, String),

    /// Any other transport or protocol error
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_connect() {
            UpstreamError::Unreachable
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

/// HTTP client for the upstream ML inference service
pub struct MlServiceClient {
    http_client: reqwest::Client,
    base_url: String,
    predict_timeout: Duration,
}

impl MlServiceClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str, predict_timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("melixa-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            predict_timeout,
        })
    }

    /// Forward a spooled audio upload to POST {base}/predict
    ///
    /// The audio body is streamed, not buffered; `filename` is the
    /// client's original filename, passed through on the multipart part.
    /// Returns the upstream JSON response as raw bytes.
    pub async fn predict(
        &self,
        audio: reqwest::Body,
        filename: String,
    ) -> Result<Bytes, UpstreamError> {
        let part = Part::stream(audio).file_name(filename);
        let form = Form::new().part("audio", part);

        let url = format!("{}/predict", self.base_url);
        tracing::debug!(url = %url, "Forwarding audio upload to ML service");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .timeout(self.predict_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status(status.as_u16(), body));
        }

        Ok(response.bytes().await?)
    }

    /// Stream audio bytes from GET {base}/deam_audio/{filename}
    pub async fn stream_audio(
        &self,
        filename: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, UpstreamError> {
        let url = format!("{}/deam_audio/{}", self.base_url, filename);
        tracing::debug!(url = %url, "Streaming audio from ML service");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(filename.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status(status.as_u16(), body));
        }

        Ok(response.bytes_stream())
    }

    /// GET {base}/api/info, relayed as raw JSON bytes
    pub async fn fetch_info(&self) -> Result<Bytes, UpstreamError> {
        self.fetch_json("/api/info").await
    }

    /// GET {base}/api/deam-info, relayed as raw JSON bytes
    pub async fn fetch_deam_info(&self) -> Result<Bytes, UpstreamError> {
        self.fetch_json("/api/deam-info").await
    }

    async fn fetch_json(&self, path: &str) -> Result<Bytes, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status(status.as_u16(), body));
        }

        Ok(response.bytes().await?)
    }
}
