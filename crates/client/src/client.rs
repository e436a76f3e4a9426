//! Thin HTTP wrapper around `POST/GET /api/generate`.

use std::time::Duration;

use reelgen_core::generation::{GenerateRequest, GenerateResponse};
use reelgen_core::job::JobSnapshot;
use reqwest::StatusCode;
use serde::Deserialize;

/// Errors returned by [`GenerateClient`] and the poller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally before anything was sent.
    #[error("Invalid submission: {0}")]
    Invalid(String),

    /// Connection, timeout or body decoding failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Error body shape shared by every 4xx/5xx the server produces.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Per-request timeout, shorter than the default poll interval so a hung
/// status query is abandoned before the next tick.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(1200);

/// Client for a single reelgen server.
#[derive(Debug, Clone)]
pub struct GenerateClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl GenerateClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Submit a generation request. Returns the new job id.
    pub async fn submit(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint())
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch the current snapshot of a job.
    ///
    /// A 404 is not an error here: the server sends a `failed` snapshot with
    /// it, which ends polling like any other terminal status.
    pub async fn status(&self, job_id: &str) -> Result<JobSnapshot, ClientError> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("jobId", job_id)])
            .timeout(self.request_timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NOT_FOUND => Ok(response.json().await?),
            _ => Err(status_error(response).await),
        }
    }
}

async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or(text);
    ClientError::Status { status, message }
}
