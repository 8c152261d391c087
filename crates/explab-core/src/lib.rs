//! explab-core: experiment tracking client core.
//!
//! Wire types for the experiments REST API, a reqwest-backed client, the view boundary
//! that front-ends implement, the selection controller, and the detail poller. Add-ons
//! (`explab-dashboard`, `explab-tui`) only talk to the backend through this crate.

mod api;
mod config;
mod controller;
mod error;
mod poller;
mod shared;
pub mod view;

// Wire data model
pub use shared::{
    CreatedExperiment, ExperimentDetail, ExperimentId, ExperimentSummary, Message, NewExperiment,
    StatusKind,
};

// Errors
pub use error::{ClientError, ClientResult};

// Configuration
pub use config::{
    ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_CONFIG_PATH, DEFAULT_POLL_INTERVAL_MS,
    MIN_POLL_INTERVAL_MS,
};

// REST surface
pub use api::{ExperimentApi, HttpExperimentApi, EXPERIMENTS_PATH};

// View boundary
pub use view::{
    format_list_entry, format_transcript, ExperimentView, ListEntry, Operation, SharedView, ViewError,
    ViewState,
};

// Controller + polling scheduler
pub use controller::{DetailOutcome, ExperimentClient};
pub use poller::{spawn_detail_poller, PollHandle};
