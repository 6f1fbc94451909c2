use anyhow::Context;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::encoder::ffmpeg::FfmpegEncoder;
use crate::infrastructure::fetch::client::HttpFetcher;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting audio transcoder...");

    let config = AppConfig::new().context("invalid startup configuration")?;

    let encoder = FfmpegEncoder::new(config.ffmpeg_path.clone(), config.encoder_timeout_secs);
    if let Err(e) = encoder.validate().await {
        warn!("ffmpeg is not usable yet, transcodes will fail: {}", e);
    }
    let fetcher = HttpFetcher::new(config.fetch_timeout_secs).context("failed to build HTTP client")?;
    let storage = StorageService::new(&config.storage);

    tokio::fs::create_dir_all(&config.temp_dir)
        .await
        .with_context(|| format!("cannot create temp dir {}", config.temp_dir.display()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState::new(config, Arc::new(encoder), Arc::new(fetcher), Arc::new(storage));
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
