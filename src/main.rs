use anyhow::{Context, Result};
use dairy_coop_site::{
    config::Config,
    contact::{ContactTransport, HttpTransport, SimulatedTransport},
    news::ContentSource,
    server::{build_router, AppState},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dairy_coop_site=info".parse()?),
        )
        .init();

    info!("Starting dairy cooperative site service");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Environment: {}, news source: {}",
        config.environment, config.news_listing_url
    );

    let content = ContentSource::new(&config.news_listing_url, config.news_request_timeout)
        .context("Failed to build news client")?;

    let transport = match &config.contact_endpoint {
        Some(endpoint) => {
            info!("Contact messages are posted to {}", endpoint);
            ContactTransport::Http(
                HttpTransport::new(endpoint, config.news_request_timeout)
                    .context("Failed to build contact client")?,
            )
        }
        None => {
            if config.is_production() {
                tracing::warn!("CONTACT_ENDPOINT not set; contact messages are only logged");
            }
            ContactTransport::Simulated(SimulatedTransport::new(config.simulated_send_delay))
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, content, transport));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
