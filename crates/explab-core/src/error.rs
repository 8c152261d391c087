//! Client error taxonomy.

use crate::shared::ExperimentId;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the REST client and the controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("experiment #{0} was never returned by the backend")]
    UnknownExperiment(ExperimentId),

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("HTTP client: {0}")]
    HttpClient(String),
}

impl ClientError {
    /// HTTP status for [`ClientError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
