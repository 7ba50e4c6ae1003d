use std::path::PathBuf;

use anyhow::{bail, Context};
use meter_client::{SourceId, WINDOW_DAYS};
use serde::Deserialize;

pub const DEFAULT_URL_TEMPLATE: &str = "https://decision.cs.taltech.ee/electricity/data/{id}.csv";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL of one source file; `{id}` is replaced by the source identifier.
    pub url_template: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub window_days: usize,
    /// How many of the configured sources take part in the same-day comparison.
    pub comparison_sources: usize,
    pub label_suffix_len: usize,
    /// Source drawn in the heatmap; the first configured source when unset.
    pub window_source: Option<SourceId>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: WINDOW_DAYS,
            comparison_sources: 10,
            label_suffix_len: 4,
            window_source: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub sources: Vec<SourceId>,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("REPORT_CONFIG").unwrap_or_else(|_| "report-config.toml".to_string());
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.sources.is_empty() {
            bail!("at least one source must be configured");
        }
        if let Some(id) = &self.report.window_source {
            if !self.sources.contains(id) {
                bail!("report.window_source '{id}' is not listed in sources");
            }
        }
        if !self.fetch.url_template.contains("{id}") {
            bail!("fetch.url_template must contain an {{id}} placeholder");
        }
        Ok(())
    }

    /// Source whose 100-day window is drawn.
    pub fn window_source(&self) -> &SourceId {
        self.report.window_source.as_ref().unwrap_or(&self.sources[0])
    }

    /// Leading sources compared on their common day.
    pub fn comparison_sources(&self) -> &[SourceId] {
        let n = self.report.comparison_sources.min(self.sources.len());
        &self.sources[..n]
    }
}
