use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use tripo::{Task, TaskStatus};

/// Fetch a task's current status.
/// GET /task/{task_id}
///
/// Always re-fetches from the remote service; the store is refreshed as a
/// side effect so the poller and this endpoint agree on the latest snapshot.
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<Task>> {
    let client = state.tripo()?;

    let task = client.get_task_status(&task_id).await?;
    state.store.put(task.clone()).await;

    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "glb".to_string()
}

/// Download the generated model in the requested format.
/// GET /task/{task_id}/download?format=glb
pub async fn download_model(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> AppResult<Response> {
    let client = state.tripo()?;

    let task = client.get_task_status(&task_id).await?;

    if task.status != TaskStatus::Success {
        return Err(AppError::BadRequest(format!(
            "Task not completed. Current status: {}",
            task.status
        )));
    }

    let Some(urls) = task.model_urls() else {
        return Err(AppError::NotFound(
            "3D model not found in task output".to_string(),
        ));
    };

    let Some(url) = urls.get(&query.format).and_then(Value::as_str) else {
        let available: Vec<&str> = urls.keys().map(String::as_str).collect();
        return Err(AppError::BadRequest(format!(
            "Format '{}' not available. Available formats: {:?}",
            query.format, available
        )));
    };

    let filename = format!("{}.{}", task_id, query.format);
    let path = client.download_file(url, &filename).await?;

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read downloaded file: {}", e)))?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, data).into_response())
}
