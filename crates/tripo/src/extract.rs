//! Ordered field-extraction strategies for the provider's loosely specified
//! response bodies. Each strategy probes one known location; callers try them
//! in sequence and fail loudly when none match.

use serde_json::Value;

pub(crate) type Strategy = fn(&Value) -> Option<&str>;

/// Known locations of the upload token, in priority order.
pub(crate) const TOKEN_STRATEGIES: &[Strategy] = &[
    data_image_token,
    data_token,
    data_file_token,
    data_as_string,
    top_level_token,
    top_level_image_token,
];

/// Known locations of the task id, in priority order.
pub(crate) const TASK_ID_STRATEGIES: &[Strategy] = &[data_task_id, top_level_task_id];

pub(crate) fn first_match<'a>(strategies: &[Strategy], payload: &'a Value) -> Option<&'a str> {
    strategies.iter().find_map(|probe| probe(payload))
}

fn data_image_token(payload: &Value) -> Option<&str> {
    payload.get("data")?.get("image_token")?.as_str()
}

fn data_token(payload: &Value) -> Option<&str> {
    payload.get("data")?.get("token")?.as_str()
}

fn data_file_token(payload: &Value) -> Option<&str> {
    payload.get("data")?.get("file_token")?.as_str()
}

fn data_as_string(payload: &Value) -> Option<&str> {
    payload.get("data")?.as_str()
}

fn top_level_token(payload: &Value) -> Option<&str> {
    payload.get("token")?.as_str()
}

fn top_level_image_token(payload: &Value) -> Option<&str> {
    payload.get("image_token")?.as_str()
}

fn data_task_id(payload: &Value) -> Option<&str> {
    payload.get("data")?.get("task_id")?.as_str()
}

fn top_level_task_id(payload: &Value) -> Option<&str> {
    payload.get("task_id")?.as_str()
}
