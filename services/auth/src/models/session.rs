//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of the logged-in user as derived from the access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role_code: Option<String>,
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub permissions: HashMap<String, bool>,
}

impl SessionUser {
    /// True when the permission flag is present and set
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.get(permission).copied().unwrap_or(false)
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Authenticated session
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whole seconds left before expiry, zero once expired
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            user: SessionUser {
                id: "1".to_string(),
                email: "ana@club.org".to_string(),
                name: None,
                role_code: Some("dirigente".to_string()),
                organization_id: Some(2),
                permissions: HashMap::from([("can_manage_teams".to_string(), true)]),
            },
            access_token: "secret-token".to_string(),
            refresh_token: None,
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = session(now + Duration::seconds(30));
        assert!(!session.is_expired_at(now));
        assert_eq!(session.remaining_secs(now), 30);
        assert!(session.is_expired_at(now + Duration::seconds(30)));
        assert_eq!(session.remaining_secs(now + Duration::seconds(45)), 0);
    }

    #[test]
    fn test_debug_hides_tokens_and_user_helpers() {
        let session = session(Utc::now());
        assert!(!format!("{:?}", session).contains("secret-token"));
        assert!(session.user.can("can_manage_teams"));
        assert!(!session.user.can("can_manage_users"));
        assert_eq!(session.user.display_name(), "ana@club.org");
    }
}
