use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use taplist_ocr::{default_backend, TapListPipeline};
use taplist_server::{router, telemetry, Config, DocumentCache, HttpImageSource, TapListService};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_subscriber("taplist-server")?;

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(port = config.port, location = ?config.location, "starting up");

    let source = HttpImageSource::new(config.location.clone(), config.fetch_timeout)
        .context("failed to build HTTP client")?;
    let pipeline = TapListPipeline::new(default_backend(&config.engine), config.pipeline);
    let service = Arc::new(TapListService::new(
        source,
        pipeline,
        Arc::new(DocumentCache::new()),
    ));

    // ── Warm-up ───────────────────────────────────────────────────────────────
    // Recognizing every cell can take up to a minute; do it before serving.
    tracing::info!("gathering tap info for the first time");
    match service.current().await {
        Ok(document) => tracing::info!(taps = document.tap_count, "tap info gathered"),
        Err(e) => tracing::warn!("initial refresh failed, will retry on first request: {e}"),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}
