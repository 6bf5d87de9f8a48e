//! Error types for the auth actions

use common::ApiError;
use thiserror::Error;

/// Why a login attempt failed. The `Display` text is the message shown to the
/// user. Server-side failures never produce a credentials message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoginError {
    /// Rejected locally before any request was sent
    #[error("{0}")]
    InvalidInput(String),

    /// Backend answered 401
    #[error("Incorrect email or password.")]
    InvalidCredentials,

    /// Backend answered 422
    #[error("Invalid data. Check the fields and try again.")]
    InvalidData,

    /// 5xx, timeout or network failure that survived the retry
    #[error("Service temporarily unavailable. Please try again in a few moments.")]
    Unavailable,

    /// Any other 4xx, with the backend's own message
    #[error("{0}")]
    Rejected(String),

    /// 2xx whose body or token could not be understood
    #[error("Unexpected response from the server. Please try again.")]
    UnexpectedResponse,
}

impl LoginError {
    /// Translate a failed credential exchange into the user-facing category
    pub fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Http { status: 401, .. } => LoginError::InvalidCredentials,
            ApiError::Http { status: 422, .. } => LoginError::InvalidData,
            ApiError::Http { status, message } if (400..500).contains(status) => {
                LoginError::Rejected(message.clone())
            }
            ApiError::InvalidRequest(message) => LoginError::InvalidInput(message.clone()),
            ApiError::Decode(_) => LoginError::UnexpectedResponse,
            ApiError::Http { .. }
            | ApiError::Timeout
            | ApiError::Network(_)
            | ApiError::Configuration(_) => LoginError::Unavailable,
        }
    }
}

/// Token and session persistence failures
#[derive(Error, Debug)]
pub enum AuthError {
    /// The access token payload could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The session cookie is missing parts or cannot be parsed
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_mapping() {
        assert_eq!(
            LoginError::from_api(&ApiError::from_response(
                401,
                r#"{"detail": "Bad password for ana"}"#
            )),
            LoginError::InvalidCredentials
        );
        assert_eq!(
            LoginError::from_api(&ApiError::from_response(422, "")),
            LoginError::InvalidData
        );
        assert_eq!(
            LoginError::from_api(&ApiError::from_response(
                403,
                r#"{"detail": "Account disabled"}"#
            )),
            LoginError::Rejected("Account disabled".to_string())
        );
        assert_eq!(
            LoginError::from_api(&ApiError::from_response(502, "")),
            LoginError::Unavailable
        );
        assert_eq!(LoginError::from_api(&ApiError::Timeout), LoginError::Unavailable);
    }

    #[test]
    fn test_server_failures_never_mention_credentials() {
        for err in [
            ApiError::from_response(500, r#"{"detail": "Invalid credentials"}"#),
            ApiError::Network("connection reset".into()),
        ] {
            let message = LoginError::from_api(&err).to_string();
            assert!(!message.contains("password"));
            assert!(!message.contains("credentials"));
        }
    }
}
