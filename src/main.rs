use anyhow::Result;
use fridgechef::provider_config::ProviderConfig;
use fridgechef::providers::ClaudeClient;
use fridgechef::server::{router, AppState};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting fridgechef API server");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = ProviderConfig::from_env();
    if config.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; analysis and generation requests will fail");
    }

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let client = Arc::new(ClaudeClient::new(config.clone())?);

    let state = AppState {
        vision: client.clone(),
        recipes: client,
        http: reqwest::Client::new(),
        config: Arc::new(config),
    };

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
