use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model version sent when the caller does not pick one.
pub const DEFAULT_MODEL_VERSION: &str = "v2.0-20240919";

/// Remote conversion job status.
///
/// The set is closed on purpose: a status string outside it fails
/// deserialization instead of passing through unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Success,
    Failed,
}

impl TaskStatus {
    /// Polling stops permanently once a task reaches a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Last-known snapshot of one conversion job.
///
/// `input` and `output` are kept as raw JSON: their shape belongs to the
/// provider and is only probed where a handler needs a specific field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub status: TaskStatus,
    pub input: Option<Value>,
    pub output: Option<Value>,
    pub progress: Option<u8>,
    pub created_time: Option<i64>,
}

impl Task {
    /// Fresh queued snapshot recorded at submission time.
    pub fn queued(task_id: impl Into<String>, created_time: i64) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Queued,
            input: None,
            output: None,
            progress: None,
            created_time: Some(created_time),
        }
    }

    /// Per-format download URLs from `output.model.urls`, when present.
    pub fn model_urls(&self) -> Option<&serde_json::Map<String, Value>> {
        self.output.as_ref()?.get("model")?.get("urls")?.as_object()
    }
}

/// Caller-supplied conversion parameters, fixed at submission time.
///
/// Unset fields are omitted from the task-creation payload entirely.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionParams {
    pub model_version: Option<String>,
    pub style: Option<String>,
    pub texture_resolution: Option<u32>,
    pub remesh: Option<String>,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            model_version: Some(DEFAULT_MODEL_VERSION.to_string()),
            style: None,
            texture_resolution: Some(1024),
            remesh: None,
        }
    }
}
