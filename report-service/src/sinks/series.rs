use futures::StreamExt;
use meter_client::{MeterSeries, SourceId};

use crate::pipeline::{Envelope, PipelineError, Sink};
use crate::sources::RowOutcome;

/// Collects parsed rows into an in-memory [`MeterSeries`].
///
/// The first upstream error aborts collection; skipped rows are counted and
/// the input line of the first one is kept.
pub struct SeriesSink {
    source: SourceId,
}

impl SeriesSink {
    pub fn new(source: SourceId) -> Self {
        Self { source }
    }
}

#[async_trait::async_trait]
impl Sink<RowOutcome> for SeriesSink {
    type Output = MeterSeries;

    async fn run<S>(&self, mut input: S) -> Result<MeterSeries, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<RowOutcome>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut series = MeterSeries::new(self.source.clone());

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::error!(source = %self.source, error = %e, "failed to load meter series");
                    return Err(e);
                }
            };

            match env.payload {
                RowOutcome::Reading(reading) => series.readings.push(reading),
                RowOutcome::Skipped(skipped) => {
                    tracing::debug!(
                        source = %self.source,
                        line = env.line,
                        raw = %skipped.raw_timestamp,
                        "skipping row with unreadable timestamp"
                    );
                    series.skipped_rows += 1;
                    series.first_skipped_line.get_or_insert(env.line);
                }
            }
        }

        tracing::info!(
            source = %self.source,
            readings = series.readings.len(),
            skipped_rows = series.skipped_rows,
            first_skipped_line = ?series.first_skipped_line,
            "meter series loaded"
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SkippedRow;
    use meter_client::Reading;
    use time::macros::datetime;

    fn env(payload: RowOutcome, line: u64) -> Result<Envelope<RowOutcome>, PipelineError> {
        Ok(Envelope { payload, line })
    }

    #[tokio::test]
    async fn collects_readings_and_counts_skips() {
        let items = vec![
            env(RowOutcome::Reading(Reading::new(datetime!(2024-01-01 00:00), Some(1.0))), 6),
            env(
                RowOutcome::Skipped(SkippedRow {
                    raw_timestamp: "x".into(),
                }),
                7,
            ),
            env(RowOutcome::Reading(Reading::new(datetime!(2024-01-01 01:00), Some(2.0))), 8),
        ];

        let sink = SeriesSink::new(SourceId::new("m1").unwrap());
        let series = sink.run(futures::stream::iter(items)).await.unwrap();
        assert_eq!(series.readings.len(), 2);
        assert_eq!(series.skipped_rows, 1);
        assert_eq!(series.first_skipped_line, Some(7));
        assert_eq!(series.source.as_str(), "m1");
    }

    #[tokio::test]
    async fn upstream_error_aborts() {
        let items = vec![
            env(RowOutcome::Reading(Reading::new(datetime!(2024-01-01 00:00), Some(1.0))), 6),
            Err(PipelineError::Source("boom".into())),
        ];

        let sink = SeriesSink::new(SourceId::new("m1").unwrap());
        let res = sink.run(futures::stream::iter(items)).await;
        assert!(matches!(res, Err(PipelineError::Source(_))));
    }
}
