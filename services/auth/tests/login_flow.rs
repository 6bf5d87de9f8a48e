//! Integration tests for the auth actions against a scripted fake backend

use api::ApiClient;
use auth::{
    AuthConfig, AuthService, LoginCredentials, LoginError, Session, SessionUser,
    session::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, SESSION_COOKIE},
};
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use chrono::Utc;
use common::{ApiConfig, CacheConfig};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Copy)]
enum Reply {
    Status(StatusCode),
    Token { expires_in_secs: i64 },
    Slow,
}

#[derive(Clone, Default)]
struct Backend {
    script: Arc<Mutex<VecDeque<Reply>>>,
    login_hits: Arc<AtomicUsize>,
    logout_hits: Arc<AtomicUsize>,
    refresh_hits: Arc<AtomicUsize>,
}

impl Backend {
    fn scripted(replies: &[Reply]) -> Self {
        let backend = Backend::default();
        backend.script.lock().unwrap().extend(replies.iter().copied());
        backend
    }

    fn next_reply(&self) -> Reply {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Token {
                expires_in_secs: 3600,
            })
    }
}

fn access_token(expires_in_secs: i64) -> String {
    encode(
        &Header::default(),
        &json!({
            "sub": 17,
            "email": "ana@club.org",
            "full_name": "Ana Souza",
            "role": "coordenador",
            "organization_id": 4,
            "permissions": {"can_register_athletes": true},
            "exp": Utc::now().timestamp() + expires_in_secs
        }),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

async fn reply(reply: Reply) -> Response {
    match reply {
        Reply::Status(status) => {
            (status, Json(json!({"detail": "scripted failure"}))).into_response()
        }
        Reply::Token { expires_in_secs } => Json(json!({
            "access_token": access_token(expires_in_secs),
            "refresh_token": "refresh-token-1",
            "token_type": "bearer"
        }))
        .into_response(),
        Reply::Slow => {
            tokio::time::sleep(Duration::from_millis(400)).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn login(
    State(backend): State<Backend>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    backend.login_hits.fetch_add(1, Ordering::SeqCst);
    if form.get("username").map(String::as_str) != Some("ana@club.org")
        || !form.contains_key("password")
    {
        return StatusCode::BAD_REQUEST.into_response();
    }
    reply(backend.next_reply()).await
}

async fn refresh(State(backend): State<Backend>, Json(body): Json<serde_json::Value>) -> Response {
    backend.refresh_hits.fetch_add(1, Ordering::SeqCst);
    if body["refresh_token"] != "refresh-token-1" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    reply(backend.next_reply()).await
}

async fn logout(State(backend): State<Backend>) -> StatusCode {
    backend.logout_hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn start(backend: Backend) -> AuthService {
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let api_config =
        ApiConfig::new(format!("http://{}", addr)).with_timeout(Duration::from_millis(200));
    let client = ApiClient::new(&api_config, CacheConfig::default()).unwrap();
    let config = AuthConfig {
        retry_delay: Duration::from_millis(10),
        ..AuthConfig::development()
    };
    AuthService::new(client, &config)
}

fn credentials() -> LoginCredentials {
    LoginCredentials::new("ana@club.org", "Handebol#2025")
}

fn empty_jar() -> SignedCookieJar {
    SignedCookieJar::new(Key::generate())
}

#[tokio::test]
async fn test_server_error_is_retried_once_then_succeeds() {
    let backend = Backend::scripted(&[Reply::Status(StatusCode::INTERNAL_SERVER_ERROR)]);
    let service = start(backend.clone()).await;

    let session = service.login(&credentials()).await.unwrap();

    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 2);
    assert_eq!(session.user.id, "17");
    assert_eq!(session.user.role_code.as_deref(), Some("coordenador"));
    assert_eq!(session.user.organization_id, Some(4));
    assert!(session.user.can("can_register_athletes"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-token-1"));
    assert!(!session.is_expired());
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let backend = Backend::scripted(&[Reply::Status(StatusCode::UNAUTHORIZED)]);
    let service = start(backend.clone()).await;

    let err = service.login(&credentials()).await.unwrap_err();

    assert_eq!(err, LoginError::InvalidCredentials);
    assert_eq!(err.to_string(), "Incorrect email or password.");
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unprocessable_gets_fixed_message() {
    let backend = Backend::scripted(&[Reply::Status(StatusCode::UNPROCESSABLE_ENTITY)]);
    let service = start(backend.clone()).await;

    let err = service.login(&credentials()).await.unwrap_err();

    assert_eq!(err, LoginError::InvalidData);
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_persistent_outage_reports_unavailable() {
    let backend = Backend::scripted(&[
        Reply::Status(StatusCode::SERVICE_UNAVAILABLE),
        Reply::Status(StatusCode::BAD_GATEWAY),
    ]);
    let service = start(backend.clone()).await;

    let err = service.login(&credentials()).await.unwrap_err();

    assert_eq!(err, LoginError::Unavailable);
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let backend = Backend::scripted(&[Reply::Slow]);
    let service = start(backend.clone()).await;

    service.login(&credentials()).await.unwrap();
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_blank_credentials_never_reach_backend() {
    let backend = Backend::default();
    let service = start(backend.clone()).await;

    let err = service
        .login(&LoginCredentials::new("ana@club.org", ""))
        .await
        .unwrap_err();

    assert_eq!(err, LoginError::InvalidInput("Password is required".to_string()));
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sign_in_persists_session_cookies() {
    let service = start(Backend::default()).await;

    let (jar, outcome) = service.sign_in(empty_jar(), &credentials()).await;
    assert!(outcome.success);
    assert!(outcome.error.is_none());
    assert!(jar.get(SESSION_COOKIE).is_some());
    assert!(jar.get(ACCESS_TOKEN_COOKIE).is_some());
    assert!(jar.get(REFRESH_TOKEN_COOKIE).is_some());

    let (_, session) = service.get_session(jar);
    let session = session.unwrap();
    assert_eq!(session.user.email, "ana@club.org");
    assert_eq!(session.user.display_name(), "Ana Souza");
}

#[tokio::test]
async fn test_failed_sign_in_reports_message_and_writes_nothing() {
    let backend = Backend::scripted(&[Reply::Status(StatusCode::UNAUTHORIZED)]);
    let service = start(backend).await;

    let (jar, outcome) = service.sign_in(empty_jar(), &credentials()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Incorrect email or password."));
    assert!(jar.get(SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn test_already_expired_token_is_not_a_login() {
    let backend = Backend::scripted(&[Reply::Token {
        expires_in_secs: -60,
    }]);
    let service = start(backend.clone()).await;

    let (jar, outcome) = service.sign_in(empty_jar(), &credentials()).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Unexpected response from the server. Please try again.")
    );
    assert_eq!(backend.login_hits.load(Ordering::SeqCst), 1);
    assert!(jar.get(SESSION_COOKIE).is_none());
    assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
}

/// A jar holding a session that expired a minute ago, plus a refresh token
fn jar_with_expired_session(service: &AuthService) -> SignedCookieJar {
    let session = Session {
        user: SessionUser {
            id: "17".to_string(),
            email: "ana@club.org".to_string(),
            name: None,
            role_code: Some("coordenador".to_string()),
            organization_id: Some(4),
            permissions: HashMap::new(),
        },
        access_token: access_token(-60),
        refresh_token: Some("refresh-token-1".to_string()),
        expires_at: Utc::now() - chrono::Duration::seconds(60),
    };
    service.store().write(empty_jar(), &session).unwrap()
}

#[tokio::test]
async fn test_expired_session_clears_itself() {
    let service = start(Backend::default()).await;
    let jar = jar_with_expired_session(&service);

    let (jar, session) = service.get_session(jar);
    assert!(session.is_none());
    assert!(jar.get(SESSION_COOKIE).is_none());
    assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
    assert!(jar.get(REFRESH_TOKEN_COOKIE).is_some());
}

#[tokio::test]
async fn test_expired_session_is_revalidated_with_refresh_token() {
    let backend = Backend::default();
    let service = start(backend.clone()).await;
    let jar = jar_with_expired_session(&service);

    let (jar, session) = service.resolve_session(jar).await;

    assert_eq!(backend.refresh_hits.load(Ordering::SeqCst), 1);
    let session = session.unwrap();
    assert!(!session.is_expired());
    assert!(service.get_session(jar).1.is_some());
}

#[tokio::test]
async fn test_logout_clears_cookies_even_when_backend_fails() {
    let backend = Backend::default();
    let service = start(backend.clone()).await;

    let (jar, _) = service.sign_in(empty_jar(), &credentials()).await;
    let jar = service.logout(jar).await;

    assert_eq!(backend.logout_hits.load(Ordering::SeqCst), 1);
    assert!(jar.get(SESSION_COOKIE).is_none());
    assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
    assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
    assert!(service.get_session(jar).1.is_none());
}

#[tokio::test]
async fn test_logout_without_session_skips_backend() {
    let backend = Backend::default();
    let service = start(backend.clone()).await;

    let jar = service.logout(empty_jar()).await;

    assert_eq!(backend.logout_hits.load(Ordering::SeqCst), 0);
    assert!(jar.get(SESSION_COOKIE).is_none());
}
