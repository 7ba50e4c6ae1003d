pub mod cache;
pub mod config;
pub mod fetch;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod server;
pub mod sinks;
pub mod sources;

pub use pipeline::{Envelope, Pipeline, PipelineError};
pub use report::{ReportSettings, ReportStore};
