use anyhow::Result;
use carbon_service::{
    config::AppConfig,
    dashboard::{self, DashboardState},
    ingest,
    metrics_server,
    observability,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let table = ingest::load_table(&cfg.dataset).await?;
    if table.is_empty() {
        tracing::warn!("dataset contains no valid observations; every query will report no data");
    }

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let app = dashboard::router(DashboardState::new(table, cfg.scoring));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
