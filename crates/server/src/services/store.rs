use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tripo::Task;

/// Last-known task snapshots keyed by task id.
///
/// Both the synchronous status endpoint and the background poller write here;
/// the discipline is last-write-wins with no versioning guard.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, task_id: &str) -> Option<Task>;

    /// Unconditionally overwrites any existing snapshot for the task id.
    async fn put(&self, task: Task);
}

/// Process-memory store; snapshots live for the process lifetime.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.read().await.get(task_id).cloned()
    }

    async fn put(&self, task: Task) {
        self.tasks.write().await.insert(task.task_id.clone(), task);
    }
}
