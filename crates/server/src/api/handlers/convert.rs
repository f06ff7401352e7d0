use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use tripo::{ConversionParams, Task};

/// Declared upload size ceiling; the remote service enforces its own limits
/// after normalization.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_FILENAME: &str = "image.jpg";

/// Submit an image for 3D conversion.
/// POST /convert/image-to-3d
///
/// Uploads the image, creates the remote task, records a queued snapshot and
/// schedules the background poller. Returns immediately; completion is
/// observed via the status endpoint.
pub async fn convert_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let client = state.tripo()?.clone();

    let mut filename = DEFAULT_FILENAME.to_string();
    let mut image: Option<Vec<u8>> = None;
    let mut params = ConversionParams::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name().unwrap_or_default() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(format!(
                        "File must be an image. Received content type: {}",
                        content_type
                    )));
                }
                if let Some(name) = field.file_name() {
                    filename = name.to_string();
                }
                let data = field.bytes().await.map_err(bad_multipart)?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::BadRequest(
                        "File size too large. Maximum size is 10MB.".to_string(),
                    ));
                }
                image = Some(data.to_vec());
            }
            "model_version" => {
                params.model_version = Some(field.text().await.map_err(bad_multipart)?);
            }
            "style" => {
                let style = field.text().await.map_err(bad_multipart)?;
                params.style = sentinel_to_unset(style);
            }
            "texture_resolution" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                let resolution = raw.parse().map_err(|_| {
                    AppError::BadRequest(format!("Invalid texture_resolution: {}", raw))
                })?;
                params.texture_resolution = Some(resolution);
            }
            "remesh" => {
                let remesh = field.text().await.map_err(bad_multipart)?;
                params.remesh = sentinel_to_unset(remesh);
            }
            _ => {}
        }
    }

    let Some(image) = image else {
        return Err(AppError::BadRequest("Missing image file".to_string()));
    };
    if image.is_empty() {
        return Err(AppError::BadRequest("Received empty file".to_string()));
    }

    tracing::info!("processing image: {} ({} bytes)", filename, image.len());

    let file_token = client.upload_image(&image, &filename).await?;
    tracing::info!("image uploaded successfully, token: {}", file_token);

    let task_id = client.create_task(&file_token, &params).await?;
    tracing::info!("task created successfully: {}", task_id);

    state
        .store
        .put(Task::queued(task_id.clone(), Utc::now().timestamp()))
        .await;
    state.monitor.watch(client, task_id.clone()).await;

    Ok(Json(json!({
        "task_id": task_id,
        "status": "queued",
        "message": "Image uploaded and conversion task started",
    })))
}

/// `"none"` (and empty) form values mean "parameter not set".
fn sentinel_to_unset(value: String) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value)
    }
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err))
}
