use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{
    pipeline::PipelineError,
    render::{render_day_chart, render_heatmap, render_page, RenderError, ReportPage, Section},
    report::ReportStore,
};

pub const PAGE_TITLE: &str = "Electricity consumption";

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Load(#[from] PipelineError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "report page failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("report page failed: {self}"),
        )
            .into_response()
    }
}

/// Run both finders and lay out the two report sections.
pub async fn build_page(store: &ReportStore) -> Result<ReportPage, PageError> {
    let window_days = store.settings().window_days;

    let heatmap = match store.window().await? {
        Some(table) => Section::Chart(render_heatmap(
            &table,
            &format!("Consumption over {window_days} days"),
        )?),
        None => Section::Notice(format!("No {window_days} consecutive complete days found.")),
    };

    let comparison = match store.common_day().await? {
        Some(day) => {
            let profiles = store.day_profiles(day).await?;
            Section::Chart(render_day_chart(day, &profiles)?)
        }
        None => Section::Notice("No common day found across sources.".to_string()),
    };

    Ok(ReportPage {
        title: PAGE_TITLE.to_string(),
        sections: vec![
            (format!("Heatmap of {window_days} consecutive days"), heatmap),
            ("Same-day comparison".to_string(), comparison),
        ],
    })
}

async fn report_page(State(store): State<Arc<ReportStore>>) -> Result<Html<String>, PageError> {
    metrics::counter!("report_page_renders_total").increment(1);
    let page = build_page(&store).await?;
    Ok(Html(render_page(&page)))
}

pub fn router(store: Arc<ReportStore>) -> Router {
    Router::new()
        .route("/", get(report_page))
        .with_state(store)
}

pub async fn serve(bind_addr: &str, store: Arc<ReportStore>) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr '{bind_addr}': {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "serving consumption report");
    axum::serve(listener, router(store).into_make_service()).await?;
    Ok(())
}
