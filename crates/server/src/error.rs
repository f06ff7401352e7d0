use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tripo::TripoError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Tripo3D API key not configured")]
    NotConfigured,

    #[error("{0}")]
    Timeout(String),

    /// Non-2xx from the provider; its status code and raw body are echoed
    /// into the detail to aid debugging.
    #[error("upstream error {status_code}: {detail}")]
    Upstream { status_code: u16, detail: String },

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            Self::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Tripo3D API key not configured".to_string(),
            ),
            Self::Timeout(detail) => (StatusCode::REQUEST_TIMEOUT, detail),
            Self::Upstream {
                status_code,
                detail,
            } => (
                StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY),
                detail,
            ),
            Self::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<TripoError> for AppError {
    fn from(err: TripoError) -> Self {
        match err {
            TripoError::Timeout { .. } => Self::Timeout(err.to_string()),
            TripoError::Api {
                status_code,
                message,
            } => Self::Upstream {
                status_code,
                detail: format!("Status {}, Response: {}", status_code, message),
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tripo_timeout_maps_to_408() {
        let err: AppError = TripoError::Timeout { op: "upload" }.into();
        assert!(matches!(&err, AppError::Timeout(d) if d == "upload timed out"));
        assert_eq!(err.into_response().status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn tripo_api_error_propagates_remote_status() {
        let err: AppError = TripoError::Api {
            status_code: 422,
            message: "bad token".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_response_maps_to_500() {
        let err: AppError = TripoError::Malformed {
            detail: "could not extract token from upload response".to_string(),
            payload: serde_json::json!({ "code": 0 }),
        }
        .into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
