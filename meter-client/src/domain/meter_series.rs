use std::collections::BTreeSet;

use time::Date;

use super::{Reading, SourceId};

/// Parsed readings of one source, in file order.
#[derive(Debug, Clone)]
pub struct MeterSeries {
    pub source: SourceId,
    pub readings: Vec<Reading>,
    /// Rows dropped while parsing because their timestamp was unreadable.
    pub skipped_rows: usize,
    /// Input line of the first skipped row.
    pub first_skipped_line: Option<u64>,
}

impl MeterSeries {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            readings: Vec::new(),
            skipped_rows: 0,
            first_skipped_line: None,
        }
    }

    /// Every calendar date with at least one reading.
    pub fn dates(&self) -> BTreeSet<Date> {
        self.readings.iter().map(Reading::date).collect()
    }

    pub fn readings_on(&self, day: Date) -> Vec<Reading> {
        self.readings
            .iter()
            .filter(|r| r.date() == day)
            .copied()
            .collect()
    }
}
