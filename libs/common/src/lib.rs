//! Common library for the handball club client
//!
//! This crate provides the pieces shared by the backend client, the auth
//! actions and the web service: the typed request error, the lookup cache,
//! the retry policy, environment configuration and input validation.

pub mod cache;
pub mod config;
pub mod error;
pub mod retry;
pub mod validation;

pub use cache::{CacheConfig, TtlCache};
pub use config::{ApiConfig, Environment};
pub use error::{ApiError, ApiResult};
pub use retry::{Backoff, RetryPolicy};
