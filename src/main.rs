mod backend;
mod config;
mod errors;
mod models;
mod routes;
mod service;

use tracing::info;

use crate::backend::EchoBackend;
use crate::config::ServerConfig;
use crate::service::relay_service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingame_assistant=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let relay = RelayService::new(EchoBackend::new());
    let app = routes::router(relay, &config.static_dir);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("In-game assistant relay running on http://{addr}/");
    info!("Chat endpoint: http://{addr}/api/chat");
    info!("Serving widget assets from {}", config.static_dir.display());

    axum::serve(listener, app).await?;
    Ok(())
}
