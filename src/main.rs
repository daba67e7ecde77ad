use std::time::Duration;

use estate_console::{app, config, state::AppState};
use tracing_subscriber::EnvFilter;

const SESSION_SWEEP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up API_BASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting estate console in {:?} mode", config.environment);

    if config.session.secret.is_empty() {
        anyhow::bail!("SESSION_SECRET must be set outside development");
    }

    let port = config.server.port;
    let state = AppState::new(config)?;
    tracing::info!("Backend API at {}", state.backend.base_url());
    state.sessions.clone().spawn_sweeper(Duration::from_secs(SESSION_SWEEP_SECS));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Estate console listening on http://{}", bind_addr);
    axum::serve(listener, app::router(state)).await?;
    Ok(())
}
