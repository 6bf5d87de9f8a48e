//! Application state shared across handlers

use api::ApiClient;
use auth::{AuthConfig, AuthService};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

#[derive(Clone)]
pub struct AppState {
    /// Backend client without credentials; handlers attach the session token
    pub api: ApiClient,
    pub auth: AuthService,
    /// Signs the session cookies
    pub key: Key,
}

impl AppState {
    pub fn new(api: ApiClient, config: &AuthConfig) -> Self {
        Self {
            auth: AuthService::new(api.clone(), config),
            api,
            key: config.session_key.clone(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
