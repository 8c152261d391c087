//! Detail polling scheduler.
//!
//! One background task per controller: every `period` it refreshes the selected
//! experiment's detail. The first tick fires one full period after spawn, ticks never
//! overlap, and [`PollHandle::stop`] interrupts an in-flight refresh.

use crate::config::MIN_POLL_INTERVAL_MS;
use crate::controller::ExperimentClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Owner of a running poller. Dropping it aborts the task.
#[derive(Debug)]
pub struct PollHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Signal the poller and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                warn!(target: "explab::poller", error = %e, "detail poller exited abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the detail poller on the current tokio runtime.
///
/// `period` is raised to [`MIN_POLL_INTERVAL_MS`] when shorter.
pub fn spawn_detail_poller(client: Arc<ExperimentClient>, period: Duration) -> PollHandle {
    let period = period.max(Duration::from_millis(MIN_POLL_INTERVAL_MS));
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(target: "explab::poller", period_ms = period.as_millis() as u64, "detail poller started");

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    if client.current_experiment_id().is_none() {
                        continue;
                    }
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        result = client.refresh_detail() => {
                            if let Err(e) = result {
                                warn!(target: "explab::poller", error = %e, "poll tick failed");
                            }
                        }
                    }
                }
            }
        }
        debug!(target: "explab::poller", "detail poller stopped");
    });

    PollHandle {
        shutdown: Some(shutdown_tx),
        task,
    }
}
