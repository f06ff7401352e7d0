use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness probe; reports whether the remote credential is configured.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Tripo3D relay backend",
        "status": "running",
        "api_configured": state.config.is_configured(),
    }))
}
