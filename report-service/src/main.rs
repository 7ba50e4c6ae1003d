use std::sync::Arc;

use anyhow::Result;
use report_service::{
    config::AppConfig, fetch::Fetcher, metrics_server, observability, server, ReportStore,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // One download pass before anything is served; per-source failures only warn.
    let fetcher = Fetcher::new(cfg.fetch.url_template.clone())?;
    let report = fetcher.download_missing(&cfg.sources, &cfg.data.dir).await?;
    for (id, failure) in &report.failed {
        tracing::warn!(source = %id, error = %failure, "source unavailable; views that need it will fail");
    }

    let store = Arc::new(ReportStore::from_config(&cfg));
    server::serve(&cfg.server.bind_addr, store).await
}
