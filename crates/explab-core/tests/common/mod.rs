//! Scripted in-process backend shared by the controller and poller tests.

#![allow(dead_code)]

use async_trait::async_trait;
use explab_core::{
    ClientError, ClientResult, CreatedExperiment, ExperimentApi, ExperimentClient, ExperimentDetail,
    ExperimentId, ExperimentSummary, NewExperiment, SharedView,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One request as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Detail(ExperimentId),
    Create(NewExperiment),
}

#[derive(Default)]
pub struct ScriptedApi {
    list: Mutex<Vec<ExperimentSummary>>,
    details: Mutex<HashMap<ExperimentId, ExperimentDetail>>,
    next_created: Mutex<Option<ExperimentId>>,
    failures: Mutex<HashMap<&'static str, ClientError>>,
    gates: Mutex<HashMap<ExperimentId, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_list(&self, list: Vec<ExperimentSummary>) {
        *self.list.lock().unwrap() = list;
    }

    pub fn set_detail(&self, id: ExperimentId, detail: ExperimentDetail) {
        self.details.lock().unwrap().insert(id, detail);
    }

    /// The next creation returns `id` and appends it to the list as "pending".
    pub fn create_returns(&self, id: ExperimentId) {
        *self.next_created.lock().unwrap() = Some(id);
    }

    /// Make every call of `kind` ("list", "detail", "create") fail with `error`.
    pub fn fail(&self, kind: &'static str, error: ClientError) {
        self.failures.lock().unwrap().insert(kind, error);
    }

    pub fn heal(&self, kind: &'static str) {
        self.failures.lock().unwrap().remove(kind);
    }

    /// Hold the next detail response for `id` until the returned sender fires.
    pub fn gate(&self, id: ExperimentId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id, rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self, id: ExperimentId) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == Call::Detail(id))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self, kind: &'static str) -> Option<ClientError> {
        self.failures.lock().unwrap().get(kind).cloned()
    }
}

#[async_trait]
impl ExperimentApi for ScriptedApi {
    async fn list_experiments(&self) -> ClientResult<Vec<ExperimentSummary>> {
        self.record(Call::List);
        if let Some(e) = self.failure("list") {
            return Err(e);
        }
        Ok(self.list.lock().unwrap().clone())
    }

    async fn get_experiment(&self, id: ExperimentId) -> ClientResult<ExperimentDetail> {
        self.record(Call::Detail(id));
        let gate = self.gates.lock().unwrap().remove(&id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(e) = self.failure("detail") {
            return Err(e);
        }
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::Status {
                url: format!("/api/experiments/{}", id),
                status: 404,
                message: "Experiment not found".to_string(),
            })
    }

    async fn create_experiment(&self, request: &NewExperiment) -> ClientResult<CreatedExperiment> {
        self.record(Call::Create(request.clone()));
        if let Some(e) = self.failure("create") {
            return Err(e);
        }
        let id = self
            .next_created
            .lock()
            .unwrap()
            .take()
            .expect("create_returns not scripted");
        self.list
            .lock()
            .unwrap()
            .push(ExperimentSummary::new(id, "pending"));
        Ok(CreatedExperiment { id })
    }
}

pub fn client_with(api: &Arc<ScriptedApi>) -> (Arc<ExperimentClient>, Arc<SharedView>) {
    let view = Arc::new(SharedView::new());
    let client = Arc::new(ExperimentClient::new(api.clone(), view.clone()));
    (client, view)
}

/// Let spawned tasks run until they park.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
