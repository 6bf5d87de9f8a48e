//! HTTP surface of the handball club client
//!
//! Login/logout backed by signed session cookies, and session-protected
//! routes for reference lookups and unified registration.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
