//! Authentication actions for the handball club client
//!
//! Credential exchange against the backend, session records derived from the
//! returned access token, and their persistence in signed cookies.

pub mod config;
pub mod error;
pub mod jwt;
pub mod models;
pub mod service;
pub mod session;

pub use config::AuthConfig;
pub use error::{AuthError, LoginError};
pub use models::{LoginCredentials, LoginOutcome, Session, SessionUser};
pub use service::AuthService;
pub use session::SessionStore;
