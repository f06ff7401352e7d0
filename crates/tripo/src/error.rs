use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripoError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{op} timed out")]
    Timeout { op: &'static str },

    #[error("{op} request failed: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("{detail}: {payload}")]
    Malformed { detail: String, payload: Value },

    #[error("Failed to write downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Split a send-level failure into the timeout vs. generic transport classes.
pub(crate) fn transport(op: &'static str, err: reqwest::Error) -> TripoError {
    if err.is_timeout() {
        TripoError::Timeout { op }
    } else {
        TripoError::Transport { op, source: err }
    }
}
