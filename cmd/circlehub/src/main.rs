//! # circlehub Binary
//!
//! The composition root: installs tracing, loads settings, wires the
//! in-memory adapters and the presence registry into the services, and
//! serves the axum router. No process-wide singletons; every handler gets
//! its dependencies through the injected state.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = configs::Settings::load().context("failed to load configuration")?;

    let state = api_adapters::AppState::in_memory(settings.engine.default_page_size);
    let app = api_adapters::router(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("🚀 circlehub listening on http://{addr}");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
