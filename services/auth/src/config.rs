//! Auth configuration

use anyhow::Result;
use axum_extra::extract::cookie::Key;
use common::Environment;
use std::time::Duration;
use tracing::warn;

/// Configuration for session cookies and the login action
#[derive(Clone)]
pub struct AuthConfig {
    /// Deployment environment; cookies are `secure` only in production
    pub environment: Environment,
    /// Key signing the session cookies
    pub session_key: Key,
    /// Delay before the single login retry
    pub retry_delay: Duration,
    /// Session lifetime when the token carries neither `exp` nor `expires_in`
    pub default_session_ttl: Duration,
    /// Lifetime of the refresh-token cookie
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `NODE_ENV`: "production" turns on the cookie `secure` flag
    /// - `SESSION_SECRET`: cookie signing secret, at least 64 bytes (default: random per process)
    /// - `LOGIN_RETRY_DELAY_MS`: delay before retrying a failed login (default: 1500)
    /// - `SESSION_DEFAULT_TTL_SECS`: fallback session lifetime (default: 3600)
    /// - `REFRESH_TOKEN_TTL_SECS`: refresh cookie lifetime (default: 604800)
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();

        let session_key = match std::env::var("SESSION_SECRET") {
            Ok(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                anyhow::anyhow!("SESSION_SECRET must be at least 64 bytes long")
            })?,
            Err(_) if environment.is_production() => {
                anyhow::bail!("SESSION_SECRET environment variable not set")
            }
            Err(_) => {
                warn!("SESSION_SECRET not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        Ok(AuthConfig {
            environment,
            session_key,
            retry_delay: Duration::from_millis(env_u64("LOGIN_RETRY_DELAY_MS", 1500)),
            default_session_ttl: Duration::from_secs(env_u64("SESSION_DEFAULT_TTL_SECS", 3600)),
            refresh_token_ttl: Duration::from_secs(env_u64("REFRESH_TOKEN_TTL_SECS", 604800)),
        })
    }

    /// Development defaults with a freshly generated key
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            session_key: Key::generate(),
            retry_delay: Duration::from_millis(1500),
            default_session_ttl: Duration::from_secs(3600),
            refresh_token_ttl: Duration::from_secs(604800),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
