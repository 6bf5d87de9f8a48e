//! Error responses of the web service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::ApiError;
use registration::SubmitError;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field errors keyed by dotted path
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),
}

impl From<SubmitError> for WebError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(errors) => WebError::Validation(errors),
            missing @ SubmitError::MissingRegistrationType => {
                WebError::BadRequest(missing.to_string())
            }
            SubmitError::Api(e) => WebError::Backend(e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            WebError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"})),
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            WebError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": "Validation failed", "fields": fields}),
            ),
            WebError::Backend(e) => backend_response(e),
        };

        (status, Json(body)).into_response()
    }
}

/// Backend 4xx answers are passed through; anything else becomes a gateway error
fn backend_response(err: ApiError) -> (StatusCode, serde_json::Value) {
    match err {
        ApiError::Http { status, message } if (400..500).contains(&status) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
            json!({"error": message}),
        ),
        ApiError::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            json!({"error": "The backend did not answer in time"}),
        ),
        other => {
            error!("Backend request failed: {}", other);
            (
                StatusCode::BAD_GATEWAY,
                json!({"error": "Service temporarily unavailable"}),
            )
        }
    }
}

pub type WebResult<T> = Result<T, WebError>;
