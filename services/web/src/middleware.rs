//! Session guard for protected routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use crate::{error::WebError, state::AppState};

/// Resolve the session from the signed cookies, refreshing it when only the
/// refresh token is left. The `Session` is put in the request extensions;
/// requests without one get a 401 and their stale cookies cleared.
pub async fn require_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let (jar, session) = state.auth.resolve_session(jar).await;

    match session {
        Some(session) => {
            req.extensions_mut().insert(session);
            (jar, next.run(req).await).into_response()
        }
        None => {
            debug!("Rejected {} {}: no session", req.method(), req.uri().path());
            (jar, WebError::Unauthorized).into_response()
        }
    }
}
