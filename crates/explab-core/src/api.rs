//! REST surface of the experiment backend.
//!
//! [`ExperimentApi`] is the seam the controller depends on; [`HttpExperimentApi`] is the
//! reqwest implementation. Every call maps its failure into a [`ClientError`] variant:
//! transport, non-2xx status, or undecodable body.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::shared::{CreatedExperiment, ExperimentDetail, ExperimentId, ExperimentSummary, NewExperiment};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Collection path, relative to the API base URL.
pub const EXPERIMENTS_PATH: &str = "/api/experiments";

/// Read and create operations against the experiment backend.
#[async_trait]
pub trait ExperimentApi: Send + Sync {
    /// `GET /api/experiments`
    async fn list_experiments(&self) -> ClientResult<Vec<ExperimentSummary>>;

    /// `GET /api/experiments/{id}`
    async fn get_experiment(&self, id: ExperimentId) -> ClientResult<ExperimentDetail>;

    /// `POST /api/experiments`
    async fn create_experiment(&self, request: &NewExperiment) -> ClientResult<CreatedExperiment>;
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed [`ExperimentApi`].
#[derive(Debug, Clone)]
pub struct HttpExperimentApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpExperimentApi {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000`). No timeout is set
    /// unless `timeout` is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: trimmed.to_string(),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, EXPERIMENTS_PATH)
    }

    fn experiment_url(&self, id: ExperimentId) -> String {
        format!("{}{}/{}", self.base_url, EXPERIMENTS_PATH, id)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let res = request.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = res.status();
        let body = res.bytes().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        debug!(target: "explab::api", %url, status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ExperimentApi for HttpExperimentApi {
    async fn list_experiments(&self) -> ClientResult<Vec<ExperimentSummary>> {
        let url = self.collection_url();
        self.send_json(&url, self.client.get(&url)).await
    }

    async fn get_experiment(&self, id: ExperimentId) -> ClientResult<ExperimentDetail> {
        let url = self.experiment_url(id);
        self.send_json(&url, self.client.get(&url)).await
    }

    async fn create_experiment(&self, request: &NewExperiment) -> ClientResult<CreatedExperiment> {
        let url = self.collection_url();
        self.send_json(&url, self.client.post(&url).json(request)).await
    }
}

/// Prefer the backend's `{"error": "..."}` message, then the raw body, then the reason phrase.
fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.error;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("empty response").to_string()
    } else {
        text
    }
}
