use std::collections::BTreeMap;

use time::Date;

use crate::domain::Reading;

pub const HOURS_PER_DAY: usize = 24;

/// Consumption reshaped into one row per calendar date and one column per
/// hour of day.
///
/// Only complete days are kept: a date with any hour lacking a value is
/// dropped. Several readings landing in the same (date, hour) cell are
/// averaged, which covers sub-hourly data and the repeated hour at the end
/// of daylight saving time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyPivot {
    rows: BTreeMap<Date, [f64; HOURS_PER_DAY]>,
}

impl DailyPivot {
    pub fn from_readings<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let mut cells: BTreeMap<Date, [(f64, u32); HOURS_PER_DAY]> = BTreeMap::new();

        for reading in readings {
            let Some(kwh) = reading.kwh.filter(|v| v.is_finite()) else {
                continue;
            };
            let row = cells
                .entry(reading.date())
                .or_insert([(0.0, 0); HOURS_PER_DAY]);
            let cell = &mut row[usize::from(reading.hour())];
            cell.0 += kwh;
            cell.1 += 1;
        }

        let rows = cells
            .into_iter()
            .filter(|(_, row)| row.iter().all(|(_, n)| *n > 0))
            .map(|(day, row)| (day, row.map(|(sum, n)| sum / f64::from(n))))
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Complete dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.rows.keys().copied()
    }

    pub fn row(&self, day: Date) -> Option<&[f64; HOURS_PER_DAY]> {
        self.rows.get(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, &[f64; HOURS_PER_DAY])> + '_ {
        self.rows.iter().map(|(day, row)| (*day, row))
    }

    /// Sub-table restricted to `days`; dates without a complete row are ignored.
    pub fn select(&self, days: &[Date]) -> DailyPivot {
        let rows = days
            .iter()
            .filter_map(|day| self.rows.get(day).map(|row| (*day, *row)))
            .collect();
        Self { rows }
    }

    /// Smallest and largest cell value, or `None` for an empty table.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows
            .values()
            .flat_map(|row| row.iter().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
