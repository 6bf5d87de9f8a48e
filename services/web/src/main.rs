use anyhow::Result;
use std::env;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use auth::AuthConfig;
use common::{ApiConfig, CacheConfig};
use web::{routes::create_router, state::AppState};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting web service");

    let api_config = ApiConfig::from_env()?;
    let cache_config = CacheConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;

    info!(
        "Backend at {} (timeout {:?}, lookup cache TTL {:?})",
        api_config.base_url, api_config.timeout, cache_config.default_ttl
    );

    let api = ApiClient::new(&api_config, cache_config)?;
    let app = create_router(AppState::new(api, &auth_config));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Web service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
