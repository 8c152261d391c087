//! Selection controller.
//!
//! [`ExperimentClient`] keeps the single active selection and drives an
//! [`ExperimentView`] from [`ExperimentApi`] responses. Every selection bumps a
//! generation counter; a detail response whose generation is no longer current is
//! dropped, so a slow response for a previously selected experiment can never overwrite
//! the one the user is looking at.

use crate::api::{ExperimentApi, HttpExperimentApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::shared::{ExperimentDetail, ExperimentId, ExperimentSummary, NewExperiment};
use crate::view::{format_transcript, ExperimentView, ListEntry, Operation};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// What a detail refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Nothing selected; no request was made.
    NoSelection,
    /// The response was rendered.
    Rendered(ExperimentDetail),
    /// The selection changed while the request for `requested` was in flight.
    Stale { requested: ExperimentId },
}

#[derive(Debug, Default)]
struct Selection {
    current: Option<ExperimentId>,
    generation: u64,
    known_ids: HashSet<ExperimentId>,
}

/// Controller over one backend and one view.
pub struct ExperimentClient {
    api: Arc<dyn ExperimentApi>,
    view: Arc<dyn ExperimentView>,
    selection: Mutex<Selection>,
}

impl ExperimentClient {
    pub fn new(api: Arc<dyn ExperimentApi>, view: Arc<dyn ExperimentView>) -> Self {
        Self {
            api,
            view,
            selection: Mutex::new(Selection::default()),
        }
    }

    /// Controller backed by [`HttpExperimentApi`] built from `config`.
    pub fn from_config(config: &ClientConfig, view: Arc<dyn ExperimentView>) -> ClientResult<Self> {
        let api = HttpExperimentApi::from_config(config)?;
        info!(target: "explab::client", base_url = %api.base_url(), "experiment client ready");
        Ok(Self::new(Arc::new(api), view))
    }

    pub fn current_experiment_id(&self) -> Option<ExperimentId> {
        self.lock_selection().current
    }

    /// True once any experiment has been selected.
    pub fn is_detail_visible(&self) -> bool {
        self.current_experiment_id().is_some()
    }

    /// Fetch all experiments and replace the rendered list.
    pub async fn refresh_list(&self) -> ClientResult<Vec<ExperimentSummary>> {
        match self.api.list_experiments().await {
            Ok(experiments) => {
                self.lock_selection()
                    .known_ids
                    .extend(experiments.iter().map(|e| e.id));
                let entries: Vec<ListEntry> = experiments.iter().map(ListEntry::from).collect();
                self.view.render_list(&entries);
                self.view.clear_error(Operation::RefreshList);
                debug!(target: "explab::client", count = entries.len(), "experiment list rendered");
                Ok(experiments)
            }
            Err(e) => {
                warn!(target: "explab::client", error = %e, "experiment list refresh failed");
                self.view.render_error(Operation::RefreshList, &e);
                Err(e)
            }
        }
    }

    /// Make `id` the active selection, show the detail section and fetch its detail.
    ///
    /// `id` must have come from a list or creation response.
    pub async fn select_experiment(&self, id: ExperimentId) -> ClientResult<DetailOutcome> {
        {
            let mut selection = self.lock_selection();
            if !selection.known_ids.contains(&id) {
                drop(selection);
                let e = ClientError::UnknownExperiment(id);
                warn!(target: "explab::client", experiment_id = id, "refusing to select unlisted experiment");
                self.view.render_error(Operation::SelectExperiment, &e);
                return Err(e);
            }
            selection.current = Some(id);
            selection.generation += 1;
        }
        info!(target: "explab::client", experiment_id = id, "experiment selected");
        self.view.clear_error(Operation::SelectExperiment);
        self.view.show_detail();
        self.refresh_detail().await
    }

    /// Re-fetch the selected experiment and overwrite status and transcript.
    pub async fn refresh_detail(&self) -> ClientResult<DetailOutcome> {
        let (id, generation) = {
            let selection = self.lock_selection();
            match selection.current {
                Some(id) => (id, selection.generation),
                None => return Ok(DetailOutcome::NoSelection),
            }
        };

        let result = self.api.get_experiment(id).await;

        // Generation check and render share one guard.
        let selection = self.lock_selection();
        if selection.generation != generation {
            debug!(
                target: "explab::client",
                experiment_id = id,
                current = ?selection.current,
                "discarding detail response for superseded selection"
            );
            return Ok(DetailOutcome::Stale { requested: id });
        }

        match result {
            Ok(detail) => {
                self.view
                    .render_detail(&detail.status, &format_transcript(&detail.conversation));
                self.view.clear_error(Operation::RefreshDetail);
                drop(selection);
                Ok(DetailOutcome::Rendered(detail))
            }
            Err(e) => {
                self.view.render_error(Operation::RefreshDetail, &e);
                drop(selection);
                warn!(target: "explab::client", experiment_id = id, error = %e, "detail refresh failed");
                Err(e)
            }
        }
    }

    /// Submit a new experiment, then refresh the list and select it.
    ///
    /// Only the creation request decides the result; list/detail follow-up failures are
    /// already rendered into the view.
    pub async fn create_experiment(&self, request: &NewExperiment) -> ClientResult<ExperimentId> {
        let created = match self.api.create_experiment(request).await {
            Ok(created) => created,
            Err(e) => {
                warn!(target: "explab::client", error = %e, "experiment creation failed");
                self.view.render_error(Operation::CreateExperiment, &e);
                return Err(e);
            }
        };
        self.view.clear_error(Operation::CreateExperiment);
        self.lock_selection().known_ids.insert(created.id);
        info!(
            target: "explab::client",
            experiment_id = created.id,
            ai_client = %request.ai_client,
            model = %request.model,
            "experiment created"
        );

        let _ = self.refresh_list().await;
        if let Err(e) = self.select_experiment(created.id).await {
            debug!(target: "explab::client", experiment_id = created.id, error = %e, "initial detail fetch failed");
        }
        Ok(created.id)
    }

    fn lock_selection(&self) -> MutexGuard<'_, Selection> {
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
