//! Session persistence in signed cookies
//!
//! The session record and the tokens live in three http-only cookies carried
//! by a `SignedCookieJar`. A cookie whose signature does not verify is read as
//! absent, so a client cannot forge or edit its own session.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::{
    config::AuthConfig,
    error::AuthError,
    models::{Session, SessionUser},
};

pub const SESSION_COOKIE: &str = "hb_session";
pub const ACCESS_TOKEN_COOKIE: &str = "hb_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "hb_refresh_token";

/// What goes into `hb_session`; tokens have their own cookies
#[derive(Serialize, Deserialize)]
struct StoredSession {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// Reads and writes the session cookies
#[derive(Debug, Clone)]
pub struct SessionStore {
    secure: bool,
    refresh_token_ttl: Duration,
}

impl SessionStore {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secure: config.environment.is_production(),
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    /// Persist `session`; cookie lifetimes follow the token lifetime
    pub fn write(
        &self,
        jar: SignedCookieJar,
        session: &Session,
    ) -> Result<SignedCookieJar, AuthError> {
        let record = serde_json::to_string(&StoredSession {
            user: session.user.clone(),
            expires_at: session.expires_at,
        })?;
        let max_age = session.remaining_secs(Utc::now());

        let mut jar = jar
            .add(self.cookie(SESSION_COOKIE, record, max_age))
            .add(self.cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone(), max_age));

        if let Some(refresh_token) = &session.refresh_token {
            let refresh_max_age =
                i64::try_from(self.refresh_token_ttl.as_secs()).unwrap_or(i64::MAX);
            jar = jar.add(self.cookie(
                REFRESH_TOKEN_COOKIE,
                refresh_token.clone(),
                refresh_max_age,
            ));
        }

        debug!("Session cookies written for user {}", session.user.id);
        Ok(jar)
    }

    /// Read the session back. `Ok(None)` when there is no session cookie at
    /// all; an error when it is present but unusable. Expiry is not checked.
    pub fn read(&self, jar: &SignedCookieJar) -> Result<Option<Session>, AuthError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };

        let stored: StoredSession = serde_json::from_str(cookie.value())
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        let access_token = self
            .access_token(jar)
            .ok_or_else(|| AuthError::InvalidSession("missing access token".to_string()))?;

        Ok(Some(Session {
            user: stored.user,
            access_token,
            refresh_token: self.refresh_token(jar),
            expires_at: stored.expires_at,
        }))
    }

    pub fn access_token(&self, jar: &SignedCookieJar) -> Option<String> {
        jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string())
    }

    pub fn refresh_token(&self, jar: &SignedCookieJar) -> Option<String> {
        jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string())
    }

    /// Remove the session record and access token, keeping the refresh token
    /// so the session can be re-validated
    pub fn clear_session(&self, jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(removal(SESSION_COOKIE))
            .remove(removal(ACCESS_TOKEN_COOKIE))
    }

    /// Remove every session cookie
    pub fn clear(&self, jar: SignedCookieJar) -> SignedCookieJar {
        self.clear_session(jar).remove(removal(REFRESH_TOKEN_COOKIE))
    }

    fn cookie(&self, name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(max_age_secs))
            .build()
    }
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;
    use axum::http::{HeaderMap, HeaderValue, header};
    use std::collections::HashMap;

    fn store(production: bool) -> SessionStore {
        SessionStore {
            secure: production,
            refresh_token_ttl: Duration::from_secs(604800),
        }
    }

    fn session() -> Session {
        Session {
            user: SessionUser {
                id: "12".to_string(),
                email: "coach@club.org".to_string(),
                name: Some("Rui Lima".to_string()),
                role_code: Some("treinador".to_string()),
                organization_id: Some(3),
                permissions: HashMap::new(),
            },
            access_token: "access.jwt.token".to_string(),
            refresh_token: Some("refresh.jwt.token".to_string()),
            expires_at: Utc::now() + chrono::Duration::minutes(30),
        }
    }

    #[test]
    fn test_write_then_read() {
        let store = store(false);
        let jar = store
            .write(SignedCookieJar::new(Key::generate()), &session())
            .unwrap();

        let read = store.read(&jar).unwrap().unwrap();
        assert_eq!(read.user.id, "12");
        assert_eq!(read.access_token, "access.jwt.token");
        assert_eq!(read.refresh_token.as_deref(), Some("refresh.jwt.token"));
    }

    #[test]
    fn test_cookie_attributes() {
        let secure_store = store(true);
        let cookie = secure_store.cookie(SESSION_COOKIE, "{}".to_string(), 1800);

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1800)));
        let plain = store(false).cookie(SESSION_COOKIE, "{}".to_string(), 1);
        assert_eq!(plain.secure(), Some(false));
    }

    #[test]
    fn test_unsigned_cookie_reads_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static(
                "hb_session={\"user\":{\"id\":\"1\"}}; hb_access_token=forged",
            ),
        );
        let jar = SignedCookieJar::from_headers(&headers, Key::generate());

        assert!(store(false).read(&jar).unwrap().is_none());
        assert!(store(false).access_token(&jar).is_none());
    }

    #[test]
    fn test_clear_session_keeps_refresh_token() {
        let store = store(false);
        let jar = store
            .write(SignedCookieJar::new(Key::generate()), &session())
            .unwrap();

        let jar = store.clear_session(jar);
        assert!(store.read(&jar).unwrap().is_none());
        assert!(store.refresh_token(&jar).is_some());

        let jar = store.clear(jar);
        assert!(store.refresh_token(&jar).is_none());
    }
}
