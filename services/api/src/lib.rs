//! Client for the handball club-management REST backend
//!
//! ```rust,no_run
//! use api::ApiClient;
//! use common::{ApiConfig, CacheConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ApiConfig::from_env()?, CacheConfig::from_env()?)?;
//!     let categories = client.categories().list(&[]).await?;
//!     println!("{} categories", categories.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod lookups;
pub mod models;
pub mod resources;

pub use client::{ApiClient, is_cacheable};
pub use lookups::{Lookups, active_season};
pub use resources::Resource;
