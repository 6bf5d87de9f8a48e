//! Error types shared by the backend client, auth actions and web service
//!
//! `ApiError` is the typed failure of a single backend request. Callers decide
//! how to present it; the client itself never retries.

use serde_json::Value;
use thiserror::Error;

/// Keys inspected, in order, when looking for a human-readable message in an
/// error body.
const MESSAGE_KEYS: [&str; 4] = ["detail", "message", "msg", "error"];

/// Failure of a request against the backend API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request was aborted because it exceeded the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Input rejected locally, never sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client misconfiguration (bad base URL, bad header value)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Build an HTTP error from a status code and the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| extract_error_message(&value))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| default_reason(status).to_string());

        ApiError::Http { status, message }
    }

    /// HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 500, 502, 503 and 504
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500 | 502 | 503 | 504))
    }

    /// Server-class failures, timeouts and network failures
    pub fn is_transient(&self) -> bool {
        self.is_server_error() || matches!(self, ApiError::Timeout | ApiError::Network(_))
    }
}

/// Best-effort message extraction from the error shapes the backend emits.
///
/// Handles `{"detail": "..."}`, validation lists such as
/// `{"detail": [{"msg": "..."}]}`, nested objects such as
/// `{"detail": {"message": "..."}}`, and top-level `message`/`error` keys.
pub fn extract_error_message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(extract_error_message).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(map) => MESSAGE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(extract_error_message),
        _ => None,
    }
}

fn default_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        422 => "Unprocessable entity",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "Request failed",
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
