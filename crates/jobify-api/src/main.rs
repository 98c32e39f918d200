//! # jobify-api: Binary Entry Point
//!
//! Loads `.env`, reads configuration from the environment, seeds the demo
//! account, and starts the Axum HTTP server (default port 5100).

use anyhow::Context;
use jobify_api::config::AppConfig;
use jobify_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");
    let port = config.port;
    let seed = config.seed_demo_user;

    let state = AppState::new(config);
    if seed {
        state
            .seed_demo_user()
            .context("failed to seed demo account")?;
    }

    let app = jobify_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Jobify API listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
