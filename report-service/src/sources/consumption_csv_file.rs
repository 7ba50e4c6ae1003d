use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::PathBuf,
};

use async_stream::try_stream;
use csv::StringRecord;
use meter_client::Reading;
use time::{macros::format_description, Date, PrimitiveDateTime, Time};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// Lines of free text at the top of every meter file.
pub const PREAMBLE_LINES: usize = 4;
const EXPECTED_COLUMNS: usize = 2;

/// Result of parsing one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Reading(Reading),
    /// Row kept out of the series; not an error.
    Skipped(SkippedRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub raw_timestamp: String,
}

/// Semicolon-separated consumption file of one meter.
///
/// Layout:
/// - four preamble lines (ignored)
/// - a header row with exactly two columns (names ignored)
/// - rows of `<day-first timestamp>;<consumption with comma decimals>`
///
/// Rows whose timestamp cannot be read are yielded as [`RowOutcome::Skipped`].
/// An unreadable consumption value or a wrong column count fails the stream.
pub struct ConsumptionCsvFileSource {
    path: PathBuf,
}

impl ConsumptionCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a day-first timestamp. Day, month and hour may be one or two digits.
/// Returns `None` for anything unrecognised.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    let formats = [
        format_description!("[day padding:none].[month padding:none].[year] [hour padding:none]:[minute]"),
        format_description!(
            "[day padding:none].[month padding:none].[year] [hour padding:none]:[minute]:[second]"
        ),
        format_description!("[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ];

    formats
        .iter()
        .find_map(|f| PrimitiveDateTime::parse(raw, *f).ok())
        .or_else(|| {
            Date::parse(raw, format_description!("[day padding:none].[month padding:none].[year]"))
                .ok()
                .map(|d| d.with_time(Time::MIDNIGHT))
        })
}

/// Parse a comma-decimal consumption value; an empty cell is a missing value.
pub fn parse_consumption(raw: &str) -> Result<Option<f64>, PipelineError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', ".")
        .parse()
        .map(Some)
        .map_err(|e| PipelineError::Source(format!("invalid consumption '{raw}': {e}")))
}

pub fn parse_record(record: &StringRecord) -> Result<RowOutcome, PipelineError> {
    let raw_ts = record.get(0).unwrap_or("");
    let Some(ts) = parse_timestamp(raw_ts) else {
        return Ok(RowOutcome::Skipped(SkippedRow {
            raw_timestamp: raw_ts.to_string(),
        }));
    };

    let kwh = parse_consumption(record.get(1).unwrap_or(""))?;
    Ok(RowOutcome::Reading(Reading::new(ts, kwh)))
}

fn skip_preamble<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    // Preamble text is not guaranteed to be UTF-8.
    let mut buf = Vec::new();
    for _ in 0..PREAMBLE_LINES {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
    }
    Ok(())
}

fn row_stream<R, F>(origin: String, open: F) -> EnvelopeStream<RowOutcome>
where
    R: Read + Send + 'static,
    F: FnOnce() -> std::io::Result<R> + Send + 'static,
{
    // Blocking reads inside a single async task; files are a few MB at most.
    let s = try_stream! {
        let inner = open()
            .map_err(|e| PipelineError::Source(format!("failed to open {origin}: {e}")))?;
        let mut reader = BufReader::new(inner);
        skip_preamble(&mut reader)
            .map_err(|e| PipelineError::Source(format!("failed to read preamble of {origin}: {e}")))?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let columns = rdr
            .byte_headers()
            .map_err(|e| PipelineError::Source(format!("failed to read header of {origin}: {e}")))?
            .len();
        if columns != EXPECTED_COLUMNS {
            Err::<(), _>(PipelineError::Source(format!(
                "{origin}: expected {EXPECTED_COLUMNS} columns, found {columns}"
            )))?;
        }

        for result in rdr.records() {
            let record = result.map_err(|e| PipelineError::Source(format!(
                "failed to read record of {origin}: {e}"
            )))?;
            let line = record.position().map_or(0, |p| p.line()) + PREAMBLE_LINES as u64;

            let outcome = parse_record(&record).map_err(|e| {
                PipelineError::Source(format!("{origin} line {line}: {e}"))
            })?;
            if matches!(outcome, RowOutcome::Skipped(_)) {
                metrics::counter!("csv_rows_skipped_total").increment(1);
            }

            yield Envelope {
                payload: outcome,
                line,
            };
        }
    };

    Box::pin(s)
}

#[async_trait::async_trait]
impl Source<RowOutcome> for ConsumptionCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<RowOutcome> {
        let path = self.path.clone();
        row_stream(format!("'{}'", path.display()), move || File::open(path))
    }
}
