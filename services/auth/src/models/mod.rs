//! Authentication models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::{Session, SessionUser};
pub use user::{LoginCredentials, LoginOutcome, TokenResponse};
