pub mod colormap;
pub mod day_chart;
pub mod heatmap;
pub mod page;

pub use day_chart::render_day_chart;
pub use heatmap::render_heatmap;
pub use page::{render_page, ReportPage, Section};

use plotters::drawing::DrawingAreaErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("nothing to draw")]
    Empty,
    #[error("drawing failed: {0}")]
    Draw(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}
