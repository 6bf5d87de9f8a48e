//! Authentication actions: login, logout, session lookup and refresh

use api::ApiClient;
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{DateTime, TimeDelta, Utc};
use common::{ApiError, Backoff, RetryPolicy};
use serde_json::json;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::{
    config::AuthConfig,
    error::{AuthError, LoginError},
    jwt::decode_claims,
    models::{LoginCredentials, LoginOutcome, Session, SessionUser, TokenResponse},
    session::SessionStore,
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Login retry policy: one retry after `delay` on 500/502/503/504, timeouts
/// and network failures. 4xx answers are final.
pub fn login_retry_policy(delay: Duration) -> RetryPolicy<ApiError> {
    RetryPolicy {
        max_attempts: 2,
        backoff: Backoff::Fixed(delay),
        retryable: ApiError::is_transient,
    }
}

/// Auth actions bound to the backend client and the cookie settings
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: SessionStore,
    retry: RetryPolicy<ApiError>,
    default_session_ttl: Duration,
}

impl AuthService {
    pub fn new(client: ApiClient, config: &AuthConfig) -> Self {
        Self {
            client,
            store: SessionStore::new(config),
            retry: login_retry_policy(config.retry_delay),
            default_session_ttl: config.default_session_ttl,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Exchange credentials for a session.
    ///
    /// Server-class failures are retried once; the caller only ever sees one
    /// of the fixed `LoginError` messages or a backend 4xx message.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, LoginError> {
        credentials.validate().map_err(LoginError::InvalidInput)?;

        let client = &self.client;
        let fields: &[(&str, &str)] = &[
            ("username", credentials.username.trim()),
            ("password", credentials.password.as_str()),
        ];

        let value = self
            .retry
            .execute(move |attempt| {
                if attempt > 1 {
                    info!("Retrying login (attempt {})", attempt);
                }
                client.post_form(LOGIN_PATH, fields)
            })
            .await
            .map_err(|e| {
                let err = LoginError::from_api(&e);
                warn!("Login failed: {} ({})", err, e);
                err
            })?;

        let tokens: TokenResponse = serde_json::from_value(value).map_err(|e| {
            error!("Login response has no usable token: {}", e);
            LoginError::UnexpectedResponse
        })?;

        let session = self.build_session(tokens, None).map_err(|e| {
            error!("Failed to build session from login response: {}", e);
            LoginError::UnexpectedResponse
        })?;

        info!("Login succeeded for user {}", session.user.id);
        Ok(session)
    }

    /// Log in and persist the session in `jar`
    pub async fn sign_in(
        &self,
        jar: SignedCookieJar,
        credentials: &LoginCredentials,
    ) -> (SignedCookieJar, LoginOutcome) {
        let session = match self.login(credentials).await {
            Ok(session) => session,
            Err(e) => return (jar, LoginOutcome::failure(&e)),
        };

        match self.store.write(jar.clone(), &session) {
            Ok(jar) => (jar, LoginOutcome::success()),
            Err(e) => {
                error!("Failed to persist session: {}", e);
                (jar, LoginOutcome::failure(&LoginError::UnexpectedResponse))
            }
        }
    }

    /// Clear the session cookies. The backend is notified best-effort; its
    /// failure never keeps the user logged in.
    pub async fn logout(&self, jar: SignedCookieJar) -> SignedCookieJar {
        if let Some(token) = self.store.access_token(&jar) {
            if let Err(e) = self.client.with_token(token).post(LOGOUT_PATH, &json!({})).await {
                warn!("Backend logout failed, clearing session anyway: {}", e);
            }
        }

        info!("Session cleared");
        self.store.clear(jar)
    }

    /// Session carried by `jar`, if any and not expired. Expired or unreadable
    /// sessions are cleared from the jar.
    pub fn get_session(&self, jar: SignedCookieJar) -> (SignedCookieJar, Option<Session>) {
        match self.store.read(&jar) {
            Ok(Some(session)) if !session.is_expired() => (jar, Some(session)),
            Ok(Some(session)) => {
                info!(
                    "Session for user {} expired at {}",
                    session.user.id, session.expires_at
                );
                (self.store.clear_session(jar), None)
            }
            Ok(None) => (jar, None),
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                (self.store.clear_session(jar), None)
            }
        }
    }

    /// Trade the refresh-token cookie for a new session. Any failure clears
    /// every session cookie.
    pub async fn refresh(&self, jar: SignedCookieJar) -> (SignedCookieJar, Option<Session>) {
        let Some(refresh_token) = self.store.refresh_token(&jar) else {
            return (jar, None);
        };

        let session = match self.exchange_refresh_token(&refresh_token).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Session refresh failed: {}", e);
                return (self.store.clear(jar), None);
            }
        };

        match self.store.write(jar.clone(), &session) {
            Ok(jar) => {
                info!("Session refreshed for user {}", session.user.id);
                (jar, Some(session))
            }
            Err(e) => {
                error!("Failed to persist refreshed session: {}", e);
                (self.store.clear(jar), None)
            }
        }
    }

    /// Current session, re-validated through the refresh token when the
    /// session itself is gone or expired
    pub async fn resolve_session(
        &self,
        jar: SignedCookieJar,
    ) -> (SignedCookieJar, Option<Session>) {
        let (jar, session) = self.get_session(jar);
        if session.is_some() || self.store.refresh_token(&jar).is_none() {
            return (jar, session);
        }

        self.refresh(jar).await
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let tokens: TokenResponse = self
            .client
            .post_json(REFRESH_PATH, &json!({ "refresh_token": refresh_token }))
            .await?;

        self.build_session(tokens, Some(refresh_token))
    }

    fn build_session(
        &self,
        tokens: TokenResponse,
        previous_refresh_token: Option<&str>,
    ) -> Result<Session, AuthError> {
        let claims = decode_claims(&tokens.access_token)?;
        let now = Utc::now();

        let expires_at = claims
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .or_else(|| {
                tokens
                    .expires_in
                    .and_then(TimeDelta::try_seconds)
                    .and_then(|ttl| now.checked_add_signed(ttl))
            })
            .or_else(|| {
                TimeDelta::from_std(self.default_session_ttl)
                    .ok()
                    .and_then(|ttl| now.checked_add_signed(ttl))
            })
            .ok_or_else(|| AuthError::InvalidToken("Token lifetime out of range".to_string()))?;

        if expires_at <= now {
            return Err(AuthError::InvalidToken(format!("Token expired at {}", expires_at)));
        }

        let user = SessionUser {
            id: claims.sub,
            email: claims.email.unwrap_or_default(),
            name: claims.name,
            role_code: claims.role_code,
            organization_id: claims.organization_id,
            permissions: claims.permissions,
        };

        Ok(Session {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string)),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ApiConfig, CacheConfig};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::Value;

    fn service(default_session_ttl: Duration) -> AuthService {
        let client =
            ApiClient::new(&ApiConfig::new("http://backend"), CacheConfig::default()).unwrap();
        let config = AuthConfig {
            default_session_ttl,
            ..AuthConfig::development()
        };
        AuthService::new(client, &config)
    }

    fn tokens(claims: Value, expires_in: Option<i64>) -> TokenResponse {
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap();
        serde_json::from_value(json!({
            "access_token": access_token,
            "refresh_token": "refresh-1",
            "expires_in": expires_in
        }))
        .unwrap()
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = json!({"sub": "8", "exp": Utc::now().timestamp() - 60});
        let result = service(Duration::from_secs(3600)).build_session(tokens(claims, None), None);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expires_in_used_without_exp_claim() {
        let session = service(Duration::from_secs(3600))
            .build_session(tokens(json!({"sub": "8"}), Some(600)), None)
            .unwrap();

        let remaining = session.remaining_secs(Utc::now());
        assert!((590..=600).contains(&remaining), "remaining {}", remaining);
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_out_of_range_lifetime_falls_back_to_default_ttl() {
        let session = service(Duration::from_secs(3600))
            .build_session(tokens(json!({"sub": "8"}), Some(i64::MAX)), None)
            .unwrap();

        let remaining = session.remaining_secs(Utc::now());
        assert!((3590..=3600).contains(&remaining), "remaining {}", remaining);
    }

    #[test]
    fn test_out_of_range_default_ttl_is_an_error() {
        let result = service(Duration::from_secs(u64::MAX))
            .build_session(tokens(json!({"sub": "8"}), None), None);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
