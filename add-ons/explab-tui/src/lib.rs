//! explab-tui: Ratatui front-end for the experiment client.
//!
//! `app` turns key presses into controller actions; `ui` draws a frame from the
//! shared view state. All backend traffic goes through `explab_core::ExperimentClient`.

pub mod app;
pub mod ui;

pub use app::{Action, App, Focus, FormField};
