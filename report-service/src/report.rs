use std::{path::PathBuf, sync::Arc};

use meter_client::{
    analysis::day_profiles, find_common_day, find_consecutive_window, DailyPivot, DayProfile,
    MeterSeries, SourceId,
};
use time::Date;

use crate::{
    cache::Memo,
    config::AppConfig,
    pipeline::{Pipeline, PipelineError},
    sinks::SeriesSink,
    sources::{ConsumptionCsvFileSource, RowOutcome},
};

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub window_source: SourceId,
    pub comparison_sources: Vec<SourceId>,
    pub window_days: usize,
    pub label_suffix_len: usize,
}

impl ReportSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            window_source: cfg.window_source().clone(),
            comparison_sources: cfg.comparison_sources().to_vec(),
            window_days: cfg.report.window_days,
            label_suffix_len: cfg.report.label_suffix_len,
        }
    }
}

/// Loads meter files on demand and memoizes every derived view.
///
/// Keys: parsed series by source, window table by source, common day by the
/// set of compared sources, day profiles by date.
pub struct ReportStore {
    data_dir: PathBuf,
    settings: ReportSettings,
    series: Memo<SourceId, Arc<MeterSeries>>,
    windows: Memo<SourceId, Option<Arc<DailyPivot>>>,
    common_days: Memo<Vec<SourceId>, Option<Date>>,
    day_profiles: Memo<Date, Arc<Vec<DayProfile>>>,
}

impl ReportStore {
    pub fn new(data_dir: impl Into<PathBuf>, settings: ReportSettings) -> Self {
        Self {
            data_dir: data_dir.into(),
            settings,
            series: Memo::new("series"),
            windows: Memo::new("window"),
            common_days: Memo::new("common_day"),
            day_profiles: Memo::new("day_profiles"),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.data.dir.clone(), ReportSettings::from_config(cfg))
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub async fn series(&self, id: &SourceId) -> Result<Arc<MeterSeries>, PipelineError> {
        let path = self.data_dir.join(id.file_name());
        let key = id.clone();
        self.series
            .get_or_try_insert_with(key, move || async move {
                let pipeline: Pipeline<_, RowOutcome, _> = Pipeline::new(
                    ConsumptionCsvFileSource::new(path),
                    SeriesSink::new(id.clone()),
                );
                Ok::<_, PipelineError>(Arc::new(pipeline.run().await?))
            })
            .await
    }

    /// Complete-day table of the configured window source, restricted to its
    /// earliest run of `window_days` consecutive days.
    pub async fn window(&self) -> Result<Option<Arc<DailyPivot>>, PipelineError> {
        self.window_for(&self.settings.window_source).await
    }

    pub async fn window_for(&self, id: &SourceId) -> Result<Option<Arc<DailyPivot>>, PipelineError> {
        let window_days = self.settings.window_days;
        self.windows
            .get_or_try_insert_with(id.clone(), move || async move {
                let series = self.series(id).await?;
                let pivot = DailyPivot::from_readings(&series.readings);

                let table = match find_consecutive_window(pivot.dates(), window_days) {
                    Some(days) => {
                        tracing::info!(
                            source = %id,
                            complete_days = pivot.len(),
                            first = %days[0],
                            last = %days[days.len() - 1],
                            "consecutive window found"
                        );
                        Some(Arc::new(pivot.select(&days)))
                    }
                    None => {
                        tracing::warn!(
                            source = %id,
                            complete_days = pivot.len(),
                            window_days,
                            "no consecutive window of complete days"
                        );
                        None
                    }
                };
                Ok::<_, PipelineError>(table)
            })
            .await
    }

    /// Earliest date on which every compared source has a reading.
    pub async fn common_day(&self) -> Result<Option<Date>, PipelineError> {
        let key = self.settings.comparison_sources.clone();
        self.common_days
            .get_or_try_insert_with(key, move || async move {
                let mut sets = Vec::with_capacity(self.settings.comparison_sources.len());
                for id in &self.settings.comparison_sources {
                    sets.push(self.series(id).await?.dates());
                }

                let day = find_common_day(&sets);
                match day {
                    Some(day) => tracing::info!(%day, sources = sets.len(), "common day found"),
                    None => tracing::warn!(sources = sets.len(), "no common day across sources"),
                }
                Ok::<_, PipelineError>(day)
            })
            .await
    }

    /// Each compared source's readings on `day`, labelled by id suffix.
    pub async fn day_profiles(&self, day: Date) -> Result<Arc<Vec<DayProfile>>, PipelineError> {
        self.day_profiles
            .get_or_try_insert_with(day, move || async move {
                let mut series = Vec::with_capacity(self.settings.comparison_sources.len());
                for id in &self.settings.comparison_sources {
                    series.push(self.series(id).await?);
                }

                let profiles = day_profiles(
                    day,
                    series.iter().map(Arc::as_ref),
                    self.settings.label_suffix_len,
                );
                Ok::<_, PipelineError>(Arc::new(profiles))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use time::macros::{date, datetime};
    use time::{Duration, PrimitiveDateTime};

    const PREAMBLE: &str = "Meter\nPeriod\n\n\nPeriood;Tarbimine\n";

    /// Hourly rows for `days` consecutive days from `start`, skipping the
    /// dates in `gaps`.
    fn meter_file(start: PrimitiveDateTime, days: i64, gaps: &[Date]) -> String {
        let mut out = PREAMBLE.to_string();
        for h in 0..days * 24 {
            let ts = start + Duration::hours(h);
            if gaps.contains(&ts.date()) {
                continue;
            }
            let _ = writeln!(
                out,
                "{:02}.{:02}.{} {:02}:00;0,{}",
                ts.day(),
                u8::from(ts.month()),
                ts.year(),
                ts.hour(),
                h % 10
            );
        }
        out
    }

    fn ids(raw: &[&str]) -> Vec<SourceId> {
        raw.iter().map(|r| SourceId::new(*r).unwrap()).collect()
    }

    fn store(dir: &std::path::Path, sources: &[&str], window_days: usize) -> ReportStore {
        let sources = ids(sources);
        ReportStore::new(
            dir,
            ReportSettings {
                window_source: sources[0].clone(),
                comparison_sources: sources,
                window_days,
                label_suffix_len: 2,
            },
        )
    }

    #[tokio::test]
    async fn window_is_earliest_complete_run() {
        let dir = tempfile::tempdir().unwrap();
        // Gap on 2024-01-04 breaks the first run.
        std::fs::write(
            dir.path().join("m01.csv"),
            meter_file(datetime!(2024-01-01 00:00), 20, &[date!(2024-01-04)]),
        )
        .unwrap();

        let store = store(dir.path(), &["m01"], 10);
        let table = store.window().await.unwrap().unwrap();
        let days: Vec<Date> = table.dates().collect();
        assert_eq!(days.len(), 10);
        assert_eq!(days[0], date!(2024-01-05));

        // Second call is served from the cache.
        std::fs::remove_file(dir.path().join("m01.csv")).unwrap();
        assert!(store.window().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn window_not_found_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m01.csv"), meter_file(datetime!(2024-01-01 00:00), 5, &[]))
            .unwrap();

        let store = store(dir.path(), &["m01"], 10);
        assert!(store.window().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn common_day_and_profiles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m01.csv"), meter_file(datetime!(2024-01-01 00:00), 10, &[]))
            .unwrap();
        std::fs::write(
            dir.path().join("m02.csv"),
            meter_file(datetime!(2024-01-03 00:00), 10, &[date!(2024-01-03)]),
        )
        .unwrap();

        let store = store(dir.path(), &["m01", "m02"], 100);
        let day = store.common_day().await.unwrap();
        assert_eq!(day, Some(date!(2024-01-04)));

        let profiles = store.day_profiles(date!(2024-01-04)).await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].label, "01");
        assert_eq!(profiles[1].label, "02");
        assert!(profiles.iter().all(|p| p.readings.len() == 24));

        let empty = store.day_profiles(date!(2024-01-01)).await.unwrap();
        assert!(empty[1].is_empty());
    }

    #[tokio::test]
    async fn missing_file_fails_and_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), &["m01"], 10);

        assert!(store.common_day().await.is_err());

        std::fs::write(dir.path().join("m01.csv"), meter_file(datetime!(2024-01-01 00:00), 1, &[]))
            .unwrap();
        assert_eq!(store.common_day().await.unwrap(), Some(date!(2024-01-01)));
    }
}
