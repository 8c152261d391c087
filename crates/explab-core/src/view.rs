//! View boundary: what the controller renders and how.
//!
//! A front-end implements [`ExperimentView`] to receive the experiment list, the detail
//! pane (status + transcript) and error state. [`SharedView`] is the in-memory view both
//! add-ons draw from; it publishes every change on a `tokio::sync::watch` channel.

use crate::error::ClientError;
use crate::shared::{ExperimentId, ExperimentSummary, Message};
use std::fmt;
use tokio::sync::watch;

/// Controller operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RefreshList,
    SelectExperiment,
    RefreshDetail,
    CreateExperiment,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RefreshList => "refresh list",
            Self::SelectExperiment => "select experiment",
            Self::RefreshDetail => "refresh detail",
            Self::CreateExperiment => "create experiment",
        };
        f.write_str(label)
    }
}

/// One selectable row of the experiment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: ExperimentId,
    pub label: String,
}

impl From<&ExperimentSummary> for ListEntry {
    fn from(summary: &ExperimentSummary) -> Self {
        Self {
            id: summary.id,
            label: format_list_entry(summary),
        }
    }
}

/// `#<id>: <status>`
pub fn format_list_entry(summary: &ExperimentSummary) -> String {
    format!("#{}: {}", summary.id, summary.status)
}

/// `sender: content` blocks separated by a blank line, in conversation order.
pub fn format_transcript(conversation: &[Message]) -> String {
    conversation
        .iter()
        .map(|m| format!("{}: {}", m.sender, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render target driven by [`crate::ExperimentClient`].
///
/// Detail rendering happens while the controller holds its selection lock, so
/// implementations must not call back into the controller.
pub trait ExperimentView: Send + Sync {
    /// Replace the whole list.
    fn render_list(&self, entries: &[ListEntry]);

    /// Make the detail section visible. Called on every selection.
    fn show_detail(&self);

    /// Overwrite status and transcript.
    fn render_detail(&self, status: &str, transcript: &str);

    fn render_error(&self, operation: Operation, error: &ClientError);

    /// Called after a successful `operation`.
    fn clear_error(&self, _operation: Operation) {}
}

/// Error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub operation: Operation,
    pub message: String,
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub list: Vec<ListEntry>,
    pub detail_visible: bool,
    pub status: Option<String>,
    pub transcript: String,
    pub error: Option<ViewError>,
}

impl ViewState {
    pub fn list_labels(&self) -> Vec<&str> {
        self.list.iter().map(|e| e.label.as_str()).collect()
    }
}

/// In-memory [`ExperimentView`] that publishes each change to its subscribers.
#[derive(Debug)]
pub struct SharedView {
    tx: watch::Sender<ViewState>,
}

impl Default for SharedView {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedView {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Receiver that is marked changed on every render.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }
}

impl ExperimentView for SharedView {
    fn render_list(&self, entries: &[ListEntry]) {
        self.tx.send_modify(|state| state.list = entries.to_vec());
    }

    fn show_detail(&self) {
        self.tx.send_modify(|state| state.detail_visible = true);
    }

    fn render_detail(&self, status: &str, transcript: &str) {
        self.tx.send_modify(|state| {
            state.status = Some(status.to_string());
            state.transcript = transcript.to_string();
        });
    }

    fn render_error(&self, operation: Operation, error: &ClientError) {
        self.tx.send_modify(|state| {
            state.error = Some(ViewError {
                operation,
                message: error.to_string(),
            })
        });
    }

    fn clear_error(&self, operation: Operation) {
        self.tx.send_if_modified(|state| match &state.error {
            Some(err) if err.operation == operation => {
                state.error = None;
                true
            }
            _ => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_joins_with_blank_line() {
        let convo = vec![Message::new("user", "hi"), Message::new("ai", "hello")];
        assert_eq!(format_transcript(&convo), "user: hi\n\nai: hello");
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn list_entry_label() {
        let entry = ListEntry::from(&ExperimentSummary::new(3, "running"));
        assert_eq!(entry, ListEntry { id: 3, label: "#3: running".into() });
    }

    #[test]
    fn clear_error_only_touches_matching_operation() {
        let view = SharedView::new();
        view.render_error(Operation::RefreshList, &ClientError::UnknownExperiment(9));
        view.clear_error(Operation::RefreshDetail);
        assert!(view.snapshot().error.is_some());
        view.clear_error(Operation::RefreshList);
        assert!(view.snapshot().error.is_none());
    }

    #[test]
    fn subscribers_see_changes() {
        let view = SharedView::new();
        let mut rx = view.subscribe();
        assert!(!rx.has_changed().unwrap());
        view.show_detail();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().detail_visible);
    }
}
