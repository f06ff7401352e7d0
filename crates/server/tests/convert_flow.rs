//! End-to-end tests driving the real server against an in-process stand-in
//! for the remote conversion API.

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};

use server::{create_router, AppState, Config};

const MODEL_BYTES: &[u8] = b"glTF-binary";

/// How the stand-in remote reports task status.
#[derive(Clone, Copy)]
enum StatusMode {
    /// queued on the first call, running on the second, success after.
    Progressing,
    AlwaysRunning,
    AlwaysSuccess,
}

struct MockRemote {
    mode: StatusMode,
    status_calls: AtomicU32,
    base_url: String,
}

async fn mock_upload() -> Json<Value> {
    Json(json!({ "data": { "image_token": "tok-1" } }))
}

async fn mock_create_task() -> Json<Value> {
    Json(json!({ "data": { "task_id": "task-123" } }))
}

async fn mock_task_status(
    State(remote): State<Arc<MockRemote>>,
    Path(_task_id): Path<String>,
) -> Json<Value> {
    let call = remote.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let status = match remote.mode {
        StatusMode::AlwaysRunning => "running",
        StatusMode::AlwaysSuccess => "success",
        StatusMode::Progressing => match call {
            1 => "queued",
            2 => "running",
            _ => "success",
        },
    };

    let mut data = json!({ "status": status, "progress": 100, "created_time": 1700000000 });
    if status == "success" {
        data["output"] = json!({
            "model": { "urls": { "glb": format!("{}/files/model.glb", remote.base_url) } }
        });
    }
    Json(json!({ "data": data }))
}

async fn mock_model_file() -> Vec<u8> {
    MODEL_BYTES.to_vec()
}

async fn spawn_mock_remote(mode: StatusMode) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let remote = Arc::new(MockRemote {
        mode,
        status_calls: AtomicU32::new(0),
        base_url: base_url.clone(),
    });

    let app = Router::new()
        .route("/upload", post(mock_upload))
        .route("/task", post(mock_create_task))
        .route("/task/{task_id}", get(mock_task_status))
        .route("/files/model.glb", get(mock_model_file))
        .with_state(remote);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url
}

fn unique_downloads_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tripo-relay-test-{}-{}", tag, std::process::id()))
}

async fn spawn_app(api_key: Option<&str>, remote_base: &str, downloads_dir: PathBuf) -> String {
    let mut config = Config::new(api_key.map(str::to_string), downloads_dir);
    config.base_url = Some(remote_base.to_string());

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn sample_jpeg() -> Vec<u8> {
    let img = RgbImage::from_pixel(50, 50, Rgb([120, 80, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

fn image_form(bytes: Vec<u8>, content_type: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name("photo.jpg")
        .mime_str(content_type)
        .unwrap();
    reqwest::multipart::Form::new()
        .part("file", part)
        .text("model_version", "v2.0-20240919")
        .text("style", "none")
        .text("texture_resolution", "1024")
        .text("remesh", "none")
}

#[tokio::test]
async fn submit_poll_and_download_glb() {
    let remote = spawn_mock_remote(StatusMode::Progressing).await;
    let downloads = unique_downloads_dir("e2e");
    let app = spawn_app(Some("test-key"), &remote, downloads.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/convert/image-to-3d", app))
        .multipart(image_form(sample_jpeg(), "image/jpeg"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["task_id"], "task-123");
    assert_eq!(body["status"], "queued");

    // The status endpoint re-fetches fresh every call, so the mock's
    // scripted sequence reaches success within a few polls.
    let mut status = String::new();
    for _ in 0..10 {
        let snapshot: Value = client
            .get(format!("{}/task/task-123", app))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        status = snapshot["status"].as_str().unwrap_or_default().to_string();
        if status == "success" {
            assert!(snapshot["output"]["model"]["urls"]["glb"]
                .as_str()
                .unwrap()
                .ends_with("/files/model.glb"));
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(status, "success");

    let download = client
        .get(format!("{}/task/task-123/download?format=glb", app))
        .send()
        .await
        .unwrap();
    assert_eq!(download.status(), 200);
    let disposition = download
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("task-123.glb"));
    assert_eq!(download.bytes().await.unwrap().as_ref(), MODEL_BYTES);

    let saved = tokio::fs::read(downloads.join("task-123.glb")).await.unwrap();
    assert_eq!(saved, MODEL_BYTES);
}

#[tokio::test]
async fn download_before_completion_names_current_status() {
    let remote = spawn_mock_remote(StatusMode::AlwaysRunning).await;
    let app = spawn_app(Some("test-key"), &remote, unique_downloads_dir("running")).await;

    let response = reqwest::get(format!("{}/task/task-123/download?format=glb", app))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["detail"],
        "Task not completed. Current status: running"
    );
}

#[tokio::test]
async fn unknown_format_lists_available_formats() {
    let remote = spawn_mock_remote(StatusMode::AlwaysSuccess).await;
    let app = spawn_app(Some("test-key"), &remote, unique_downloads_dir("format")).await;

    let response = reqwest::get(format!("{}/task/task-123/download?format=obj", app))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Format 'obj' not available"), "{}", detail);
    assert!(detail.contains("glb"), "{}", detail);
}

#[tokio::test]
async fn non_image_content_type_is_rejected() {
    let remote = spawn_mock_remote(StatusMode::Progressing).await;
    let app = spawn_app(Some("test-key"), &remote, unique_downloads_dir("ctype")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/convert/image-to-3d", app))
        .multipart(image_form(b"plain text".to_vec(), "text/plain"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("File must be an image"));
}

#[tokio::test]
async fn empty_file_is_rejected() {
    let remote = spawn_mock_remote(StatusMode::Progressing).await;
    let app = spawn_app(Some("test-key"), &remote, unique_downloads_dir("empty")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/convert/image-to-3d", app))
        .multipart(image_form(Vec::new(), "image/jpeg"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Received empty file");
}

#[tokio::test]
async fn missing_credential_fails_per_request_but_health_stays_up() {
    let remote = spawn_mock_remote(StatusMode::Progressing).await;
    let app = spawn_app(None, &remote, unique_downloads_dir("nokey")).await;

    let health: Value = reqwest::get(format!("{}/", app))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "running");
    assert_eq!(health["api_configured"], false);

    let response = reqwest::get(format!("{}/task/task-123", app)).await.unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Tripo3D API key not configured");
}
