use std::path::{Path, PathBuf};

use meter_client::SourceId;
use reqwest::StatusCode;

/// Failure that stops the whole download pass.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to create data directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single source could not be downloaded. Never aborts the pass.
#[derive(thiserror::Error, Debug)]
pub enum FetchFailure {
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to write file: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Default)]
pub struct FetchReport {
    pub downloaded: Vec<SourceId>,
    pub present: Vec<SourceId>,
    pub failed: Vec<(SourceId, FetchFailure)>,
}

/// Downloads one consumption file per source into a local directory.
///
/// Files already on disk are left alone. Each missing file gets exactly one
/// GET; anything but `200 OK` is reported and the pass moves on.
pub struct Fetcher {
    client: reqwest::Client,
    url_template: String,
}

impl Fetcher {
    pub fn new(url_template: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    pub fn url_for(&self, id: &SourceId) -> String {
        self.url_template.replace("{id}", id.as_str())
    }

    pub async fn download_missing(
        &self,
        sources: &[SourceId],
        dir: &Path,
    ) -> Result<FetchReport, FetchError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| FetchError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut report = FetchReport::default();
        for id in sources {
            let path = dir.join(id.file_name());
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                metrics::counter!("fetch_present_total").increment(1);
                tracing::debug!(source = %id, "meter file already present");
                report.present.push(id.clone());
                continue;
            }

            match self.download(id, &path).await {
                Ok(()) => {
                    metrics::counter!("fetch_downloaded_total").increment(1);
                    report.downloaded.push(id.clone());
                }
                Err(failure) => {
                    metrics::counter!("fetch_failed_total").increment(1);
                    tracing::warn!(source = %id, error = %failure, "meter file download failed");
                    report.failed.push((id.clone(), failure));
                }
            }
        }

        tracing::info!(
            downloaded = report.downloaded.len(),
            present = report.present.len(),
            failed = report.failed.len(),
            "download pass finished"
        );
        Ok(report)
    }

    async fn download(&self, id: &SourceId, path: &Path) -> Result<(), FetchFailure> {
        let url = self.url_for(id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status));
        }
        let body = response.bytes().await?;

        // A partially written file must never sit under the final name.
        let partial = path.with_extension("csv.part");
        tokio::fs::write(&partial, &body).await?;
        tokio::fs::rename(&partial, path).await?;

        tracing::info!(
            source = %id,
            bytes = body.len(),
            blake3 = %blake3::hash(&body).to_hex(),
            "downloaded meter file"
        );
        Ok(())
    }
}
