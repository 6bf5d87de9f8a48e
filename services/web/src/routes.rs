//! Web service routes

use api::{Lookups, active_season};
use auth::{LoginCredentials, Session};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::SignedCookieJar;
use registration::{RegistrationForm, UnifiedRegistrationFormData, submit};
use serde_json::json;
use tracing::info;

use crate::{
    error::{WebError, WebResult},
    middleware::require_session,
    state::AppState,
};

/// Create the router for the web service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/lookups", get(lookups))
        .route("/seasons/active", get(current_season))
        .route("/registrations", post(create_registration))
        .route("/registrations/validate", post(validate_registration))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "web"
    }))
}

/// Log in; the outcome is always reported in the body
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(credentials): Json<LoginCredentials>,
) -> impl IntoResponse {
    let (jar, outcome) = state.auth.sign_in(jar, &credentials).await;
    (jar, Json(outcome))
}

pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let jar = state.auth.logout(jar).await;
    (jar, StatusCode::NO_CONTENT)
}

/// Current session, if any. Never fails: a missing session is reported as
/// `authenticated: false`.
pub async fn session(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, session) = state.auth.resolve_session(jar).await;

    let body = match session {
        Some(session) => json!({
            "authenticated": true,
            "user": session.user,
            "expires_at": session.expires_at,
        }),
        None => json!({"authenticated": false}),
    };

    (jar, Json(body))
}

/// Reference lists for the registration form
pub async fn lookups(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> WebResult<Json<Lookups>> {
    let client = state.api.with_token(session.access_token);
    Ok(Json(Lookups::load(&client).await?))
}

pub async fn current_season(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    let client = state.api.with_token(session.access_token);
    Json(active_season(&client).await)
}

/// Check a form without submitting it
pub async fn validate_registration(
    Json(data): Json<UnifiedRegistrationFormData>,
) -> impl IntoResponse {
    let mut form = RegistrationForm::from_data(data);
    form.touch_all();

    Json(json!({
        "can_save": form.can_save(),
        "create_user": form.will_create_user(),
        "is_goalkeeper": form.is_goalkeeper(),
        "errors": form.visible_errors(),
    }))
}

pub async fn create_registration(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(data): Json<UnifiedRegistrationFormData>,
) -> WebResult<impl IntoResponse> {
    let client = state.api.with_token(session.access_token);
    let mut form = RegistrationForm::from_data(data);

    let result = submit(&mut form, &client).await.map_err(WebError::from)?;

    info!(
        "User {} registered person {}",
        session.user.id, result.person_id
    );
    Ok((StatusCode::CREATED, Json(result)))
}
