// =============================================================================
// Borsa Analytics API — Main Entry Point
// =============================================================================
//
// Startup order: environment, logging, config, shared state, optional
// keep-alive task, HTTP server, then wait for Ctrl+C.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod error;
mod feed;
mod indicators;
mod keepalive;
mod runtime_config;
mod series;
mod signals;
mod types;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Borsa Analytics API starting up");

    let config_path =
        std::env::var("BORSA_CONFIG").unwrap_or_else(|_| "borsa_config.json".to_string());
    let mut config = match RuntimeConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            let config = RuntimeConfig::default();
            // First run: materialise the defaults so operators have a file
            // to edit.
            if !std::path::Path::new(&config_path).exists() {
                if let Err(e) = config.save(&config_path) {
                    warn!(error = %e, "Failed to write default config");
                }
            }
            config
        }
    };

    // Environment overrides.
    if let Ok(url) = std::env::var("BORSA_FEED_URL") {
        config.feed_url = url;
    }
    if let Ok(url) = std::env::var("BORSA_KEEPALIVE_URL") {
        config.keepalive_url = Some(url);
    }

    info!(
        feed_url = %config.feed_url,
        rsi_window = config.indicators.rsi_window,
        sma_window = config.indicators.sma_window,
        "configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config.clone()));

    // ── 3. Keep-alive self-ping (optional) ───────────────────────────────
    if let Some(url) = config.keepalive_url.clone() {
        let interval = config.keepalive_interval_secs;
        tokio::spawn(async move {
            keepalive::run_keepalive(url, interval).await;
        });
    }

    // ── 4. Start the API server ──────────────────────────────────────────
    let bind_addr = std::env::var("BORSA_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {bind_addr}: {e}"))?;
    info!(addr = %bind_addr, "API server listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!(error = %e, "API server exited");
        }
    });

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping");
    server.abort();

    info!("Borsa Analytics API shut down complete.");
    Ok(())
}
