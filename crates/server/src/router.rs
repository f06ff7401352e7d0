use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::handlers::{convert, health, tasks};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route(
            "/convert/image-to-3d",
            post(convert::convert_image)
                // Leave headroom over the declared file ceiling for the rest
                // of the form.
                .layer(DefaultBodyLimit::max(convert::MAX_UPLOAD_BYTES + 1024 * 1024)),
        )
        .route("/task/{task_id}", get(tasks::get_task))
        .route("/task/{task_id}/download", get(tasks::download_model))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
