use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tripo::{Task, TripoClient};

use super::store::TaskStore;

/// Fixed sleep between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Attempt budget per task; 120 attempts at 5s is roughly ten minutes.
pub const MAX_POLL_ATTEMPTS: u32 = 120;

/// Source of fresh task status snapshots (the remote API in production).
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn task_status(&self, task_id: &str) -> tripo::Result<Task>;
}

#[async_trait]
impl StatusSource for TripoClient {
    async fn task_status(&self, task_id: &str) -> tripo::Result<Task> {
        self.get_task_status(task_id).await
    }
}

/// Supervises one background poller per submitted task.
///
/// Each poller refreshes the store until the task reaches a terminal status
/// or the attempt budget runs out; handles are retained so an orderly
/// shutdown can cancel whatever is still in flight.
pub struct TaskMonitor {
    store: Arc<dyn TaskStore>,
    interval: Duration,
    max_attempts: u32,
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TaskMonitor {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self::with_timing(store, POLL_INTERVAL, MAX_POLL_ATTEMPTS)
    }

    pub fn with_timing(store: Arc<dyn TaskStore>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            store,
            interval,
            max_attempts,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Starts polling a freshly submitted task. Fire-and-forget from the
    /// caller's perspective; the handle is kept for shutdown cancellation.
    pub async fn watch(&self, source: Arc<dyn StatusSource>, task_id: String) {
        let handle = tokio::spawn(poll_until_terminal(
            source,
            Arc::clone(&self.store),
            task_id.clone(),
            self.interval,
            self.max_attempts,
        ));

        let mut handles = self.handles.lock().await;
        handles.retain(|_, h| !h.is_finished());
        handles.insert(task_id, handle);
    }

    /// Aborts every poller that has not already finished.
    pub async fn shutdown(&self) {
        for (task_id, handle) in self.handles.lock().await.drain() {
            if !handle.is_finished() {
                handle.abort();
                tracing::debug!("cancelled poller for task {}", task_id);
            }
        }
    }
}

async fn poll_until_terminal(
    source: Arc<dyn StatusSource>,
    store: Arc<dyn TaskStore>,
    task_id: String,
    interval: Duration,
    max_attempts: u32,
) {
    let mut attempt = 0;
    while attempt < max_attempts {
        match source.task_status(&task_id).await {
            Ok(task) => {
                let status = task.status;
                store.put(task).await;
                tracing::info!("task {} status: {} (attempt {})", task_id, status, attempt + 1);

                if status.is_terminal() {
                    tracing::info!("task {} completed with status: {}", task_id, status);
                    return;
                }
            }
            // A single failed attempt never aborts the loop; it costs one
            // attempt and the usual sleep.
            Err(e) => tracing::error!("error monitoring task {}: {}", task_id, e),
        }

        tokio::time::sleep(interval).await;
        attempt += 1;
    }

    tracing::warn!(
        "task {} monitoring timed out after {} attempts",
        task_id,
        max_attempts
    );
}
