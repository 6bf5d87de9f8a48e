//! Environment-driven configuration for the backend client

use anyhow::Result;
use std::time::Duration;

/// Backend base URL used when `NEXT_PUBLIC_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Request timeout used when `API_TIMEOUT_SECS` is not set. The hosted
/// backend can take close to a minute to wake up from a cold start.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Deployment environment, read from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Read `NODE_ENV`; anything unrecognised is treated as development
    pub fn from_env() -> Self {
        std::env::var("NODE_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without trailing slash (e.g. "https://api.example.org")
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Build a config for an explicit base URL with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `NEXT_PUBLIC_API_URL`: backend base URL (default: "http://localhost:8000")
    /// - `API_TIMEOUT_SECS`: request timeout in seconds (default: 60)
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("NEXT_PUBLIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("NEXT_PUBLIC_API_URL must be an http(s) URL, got {}", base_url);
        }

        let timeout_secs = std::env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(ApiConfig {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Same config with a different timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
