use crate::error::{ClinicError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract the human-readable message from a backend error body
pub fn extract_error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(|m| m.as_str()))
        .map(|m| m.trim())
        .find(|m| !m.is_empty())
        .map(|m| m.to_string())
}

/// Build the error for a non-success response from its status and raw body
pub fn error_from_body(status: u16, body: &str) -> ClinicError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json));
    ClinicError::from_status(status, message)
}

/// Decode a success body. An empty body is treated as JSON `null`.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(trimmed)?)
}
