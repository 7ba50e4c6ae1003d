use anyhow::{bail, Context, Result};
use meter_client::{find_consecutive_window, DailyPivot, SourceId, WINDOW_DAYS};
use report_service::{
    observability,
    pipeline::Pipeline,
    sinks::SeriesSink,
    sources::{ConsumptionCsvFileSource, RowOutcome},
};
use std::{env, path::Path};

/// Parse one downloaded meter file and report what the heatmap would show.
///
/// Usage:
///   inspect_meter <csv_file_path> [window_days]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing_with("report_service=info,inspect_meter=info");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: inspect_meter <csv_file_path> [window_days]");
    }
    let file_path = Path::new(&args[1]);
    let window_days = match args.get(2) {
        Some(raw) => raw.parse().with_context(|| format!("invalid window_days '{raw}'"))?,
        None => WINDOW_DAYS,
    };

    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("file name is not valid UTF-8")?;
    let id = SourceId::new(stem)?;

    let pipeline: Pipeline<_, RowOutcome, _> = Pipeline::new(
        ConsumptionCsvFileSource::new(file_path),
        SeriesSink::new(id.clone()),
    );
    let series = pipeline.run().await?;

    let pivot = DailyPivot::from_readings(&series.readings);
    let dates = series.dates();
    tracing::info!(
        source = %id,
        readings = series.readings.len(),
        skipped_rows = series.skipped_rows,
        days_with_readings = dates.len(),
        complete_days = pivot.len(),
        first_day = ?dates.first(),
        last_day = ?dates.last(),
        "meter file parsed"
    );

    match find_consecutive_window(pivot.dates(), window_days) {
        Some(days) => tracing::info!(
            window_days,
            first = %days[0],
            last = %days[days.len() - 1],
            "consecutive window of complete days"
        ),
        None => tracing::warn!(window_days, "no consecutive window of complete days"),
    }

    Ok(())
}
