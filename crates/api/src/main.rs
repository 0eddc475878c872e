use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voxform_api::{build_router, state::AppState};
use voxform_config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("failed to load configuration")?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let state = AppState::new(settings);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("voxform listening on {addr}");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
