use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::TripoClient;
use crate::error::{transport, TripoError};
use crate::extract;
use crate::models::{ConversionParams, Task, TaskStatus};

const CREATE_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// `data` object of a task status response.
#[derive(Debug, Deserialize)]
struct TaskData {
    status: TaskStatus,
    #[serde(default)]
    input: Option<Value>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    progress: Option<u8>,
    #[serde(default)]
    created_time: Option<i64>,
}

impl TripoClient {
    /// Create an image-to-model conversion task for an uploaded file token.
    /// POST /task
    pub async fn create_task(
        &self,
        file_token: &str,
        params: &ConversionParams,
    ) -> crate::Result<String> {
        let payload = build_task_payload(file_token, params);
        tracing::info!("creating task with payload: {}", payload);

        let response = self
            .client()
            .post(self.url("/task"))
            .bearer_auth(self.api_key())
            .json(&payload)
            .timeout(CREATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport("task creation", e))?;

        let body = self.read_json(response).await?;
        match extract::first_match(extract::TASK_ID_STRATEGIES, &body) {
            Some(task_id) => Ok(task_id.to_string()),
            None => Err(TripoError::Malformed {
                detail: "could not extract task_id from response".to_string(),
                payload: body,
            }),
        }
    }

    /// Fetch the current status snapshot of a task.
    /// GET /task/{task_id}
    pub async fn get_task_status(&self, task_id: &str) -> crate::Result<Task> {
        let response = self
            .client()
            .get(self.url(&format!("/task/{}", task_id)))
            .bearer_auth(self.api_key())
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport("status check", e))?;

        let body = self.read_json(response).await?;
        let Some(data) = body.get("data") else {
            return Err(TripoError::Malformed {
                detail: "invalid task status response format".to_string(),
                payload: body,
            });
        };

        let data: TaskData = serde_json::from_value(data.clone())?;
        Ok(Task {
            task_id: task_id.to_string(),
            status: data.status,
            input: data.input,
            output: data.output,
            progress: data.progress,
            created_time: data.created_time,
        })
    }
}

/// Builds the task-creation payload; the `extra` object carries only the
/// parameters the caller actually set, with the `"none"` sentinel treated as
/// unset for style and remesh.
fn build_task_payload(file_token: &str, params: &ConversionParams) -> Value {
    let mut payload = json!({
        "type": "image_to_model",
        "file": {
            "type": "image",
            "file_token": file_token,
        },
    });

    let mut extra = serde_json::Map::new();
    if let Some(model_version) = &params.model_version {
        extra.insert("model_version".to_string(), json!(model_version));
    }
    if let Some(style) = &params.style {
        if style != "none" {
            extra.insert("style".to_string(), json!(style));
        }
    }
    if let Some(resolution) = params.texture_resolution {
        extra.insert("texture_resolution".to_string(), json!(resolution));
    }
    if let Some(remesh) = &params.remesh {
        if remesh != "none" {
            extra.insert("remesh".to_string(), json!(remesh));
        }
    }
    if !extra.is_empty() {
        payload["extra"] = Value::Object(extra);
    }

    payload
}
