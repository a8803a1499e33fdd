mod bridge;
mod config;
mod errors;
mod export;
mod markup;
mod models;
mod persistence;
mod routes;
mod session;
mod state;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::persistence::create_store;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so the log level can come from it
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EleganceCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the snapshot store (file by default, redis or memory via STORE_BACKEND)
    let store = create_store(&config).await?;

    let state = AppState::new(config.clone(), store);
    state.sessions.spawn_idle_sweeper(config.session_idle);
    info!("Idle sessions are evicted after {}s", config.session_idle.as_secs());
    info!(
        "PDF page: {}x{}pt, margin {}pt",
        state.page_config.width, state.page_config.height, state.page_config.margin
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
