//! Result Convergence
//!
//! Waits for an asynchronous workflow outcome by racing a fixed-interval poll
//! of the durable store against its live change feed. Whichever path reports
//! first wins; the `select!` loop owns both the ticker and the feed receiver,
//! so returning from it releases the loser on every exit path (hit, timeout,
//! or external cancellation of the future).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep_until, Instant};

use crate::storage::results::{ResultRecord, ResultStore};

use super::types::WorkflowOutcome;

/// Fixed probe interval for the poll path.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default deadline for one convergence call (5 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Converges on workflow results for one owner scope.
pub struct ResultConvergence {
    store: Arc<dyn ResultStore>,
    scope_id: String,
}

impl ResultConvergence {
    pub fn new(store: Arc<dyn ResultStore>, scope_id: impl Into<String>) -> Self {
        Self {
            store,
            scope_id: scope_id.into(),
        }
    }

    /// Wait for the result of `task_id`, up to `timeout` (default 5 minutes).
    ///
    /// Probes the store synchronously first; a hit resolves immediately
    /// without starting any timer. Otherwise the poll tick, the change feed,
    /// and the deadline race inside one `select!` loop, guaranteeing exactly
    /// one resolution per call. Store probe errors are logged and treated as
    /// "not found yet" — the loop keeps racing until the deadline.
    pub async fn await_result(&self, task_id: &str, timeout: Option<Duration>) -> WorkflowOutcome {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        if let Some(record) = self.probe(task_id).await {
            return resolved(record);
        }

        let mut live = self.store.subscribe(&self.scope_id).await;
        let deadline = Instant::now() + timeout;
        // First tick fires after one full interval; the immediate probe
        // already covered "now".
        let mut ticker = interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    tracing::warn!(task_id, timeout_secs = timeout.as_secs(), "timed out waiting for workflow result");
                    return WorkflowOutcome::failed("Timeout waiting for result");
                }
                _ = ticker.tick() => {
                    if let Some(record) = self.probe(task_id).await {
                        return resolved(record);
                    }
                }
                event = recv_next(&mut live) => {
                    match event {
                        Some(record) if record.webhook_id == task_id => return resolved(record),
                        Some(_) => {} // another task in this scope
                        None => {
                            // Feed closed; keep converging on polling alone.
                            tracing::debug!(task_id, "change feed closed, falling back to polling");
                            live = None;
                        }
                    }
                }
            }
        }
    }

    /// Standing subscription delivering every record visible to `scope_id`.
    ///
    /// Runs until the returned handle is dropped or explicitly unsubscribed;
    /// there is no timeout.
    pub fn subscribe_to_results(
        &self,
        scope_id: &str,
        mut callback: impl FnMut(ResultRecord) + Send + 'static,
    ) -> ResultSubscription {
        let store = Arc::clone(&self.store);
        let scope_id = scope_id.to_string();
        let task = tokio::spawn(async move {
            let Some(mut rx) = store.subscribe(&scope_id).await else {
                tracing::warn!(scope_id, "change feed unavailable, standing subscription inactive");
                return;
            };
            while let Some(record) = rx.recv().await {
                callback(record);
            }
        });
        ResultSubscription { task }
    }

    async fn probe(&self, task_id: &str) -> Option<ResultRecord> {
        match self.store.find_result(task_id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(task_id, error = %e, "result probe failed");
                None
            }
        }
    }
}

/// Handle for a standing change-feed subscription. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) stops delivery.
pub struct ResultSubscription {
    task: tokio::task::JoinHandle<()>,
}

impl ResultSubscription {
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for ResultSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn resolved(record: ResultRecord) -> WorkflowOutcome {
    WorkflowOutcome {
        success: true,
        task_id: Some(record.webhook_id.clone()),
        data: serde_json::to_value(record).ok(),
        estimated_seconds: None,
        error: None,
    }
}

/// Receive from the optional live feed; pends forever once the feed is gone
/// so the other `select!` arms keep the loop alive.
async fn recv_next(live: &mut Option<mpsc::Receiver<ResultRecord>>) -> Option<ResultRecord> {
    match live {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
