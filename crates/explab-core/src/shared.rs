//! Wire data model for the experiments API.
//!
//! Everything here is owned by the backend; the client only holds transient copies for
//! rendering. Optional fields are the extras the backend is known to send; their absence
//! is never an error.

use serde::{Deserialize, Serialize};

/// Backend-assigned experiment identity.
pub type ExperimentId = i64;

/// One row of `GET /api/experiments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: ExperimentId,
    /// Opaque server-side status (e.g. "pending", "running", "success", "failed").
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ExperimentSummary {
    pub fn new(id: ExperimentId, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
            prompt: None,
            ai_client: None,
            model: None,
        }
    }
}

/// One transcript entry. Order within [`ExperimentDetail::conversation`] is chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
    /// ISO-8601 timestamp as emitted by the backend; kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Body of `GET /api/experiments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExperimentId>,
    pub status: String,
    #[serde(default)]
    pub conversation: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ExperimentDetail {
    pub fn new(status: impl Into<String>, conversation: Vec<Message>) -> Self {
        Self {
            id: None,
            status: status.into(),
            conversation,
            prompt: None,
            ai_client: None,
            model: None,
        }
    }
}

/// Body of `POST /api/experiments`. Fields are sent as typed; empty strings included.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewExperiment {
    pub prompt: String,
    pub ai_client: String,
    pub model: String,
}

impl NewExperiment {
    pub fn new(prompt: impl Into<String>, ai_client: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ai_client: ai_client.into(),
            model: model.into(),
        }
    }

    /// Builds a request from a combined `client:model` choice, split on the first `:`.
    /// A choice without `:` names the client and leaves the model empty.
    pub fn from_model_choice(prompt: impl Into<String>, choice: &str) -> Self {
        let (ai_client, model) = choice.split_once(':').unwrap_or((choice, ""));
        Self::new(prompt, ai_client.trim(), model.trim())
    }
}

/// Response of `POST /api/experiments`. Only `id` is relied upon; anything else the
/// backend sends is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedExperiment {
    pub id: ExperimentId,
}

/// Coarse bucket for the backend's free-form status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// Anything the client does not recognise.
    Other,
}

impl StatusKind {
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn classify(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "success" | "done" | "completed" => Self::Succeeded,
            "running" => Self::Running,
            "pending" | "queued" => Self::Pending,
            "failed" | "error" => Self::Failed,
            _ => Self::Other,
        }
    }
}
