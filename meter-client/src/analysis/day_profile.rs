use time::Date;

use crate::domain::{MeterSeries, Reading};

/// One source's readings on a single day, labelled for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DayProfile {
    pub label: String,
    pub readings: Vec<Reading>,
}

impl DayProfile {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// (hour of day, kWh) pairs in time order, skipping missing and non-finite values.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let mut readings = self.readings.clone();
        readings.sort_by_key(|r| r.ts);
        readings
            .iter()
            .filter_map(|r| r.kwh.filter(|kwh| kwh.is_finite()).map(|kwh| (r.hour_of_day(), kwh)))
            .collect()
    }
}

/// Extract `day` from each series, keeping the series order.
///
/// Series without readings on that day produce an empty profile.
pub fn day_profiles<'a, I>(day: Date, series: I, label_suffix_len: usize) -> Vec<DayProfile>
where
    I: IntoIterator<Item = &'a MeterSeries>,
{
    series
        .into_iter()
        .map(|s| DayProfile {
            label: s.source.label(label_suffix_len).to_string(),
            readings: s.readings_on(day),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceId;
    use time::macros::{date, datetime};

    fn series(id: &str, readings: Vec<Reading>) -> MeterSeries {
        MeterSeries {
            source: SourceId::new(id).unwrap(),
            readings,
            skipped_rows: 0,
            first_skipped_line: None,
        }
    }

    #[test]
    fn extracts_day_per_source_with_suffix_labels() {
        let a = series(
            "aaaa0001",
            vec![
                Reading::new(datetime!(2024-01-05 01:00), Some(0.5)),
                Reading::new(datetime!(2024-01-05 00:00), Some(0.25)),
                Reading::new(datetime!(2024-01-06 00:00), Some(9.0)),
            ],
        );
        let b = series("bbbb0002", vec![Reading::new(datetime!(2024-01-04 00:00), Some(1.0))]);

        let profiles = day_profiles(date!(2024-01-05), [&a, &b], 4);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].label, "0001");
        assert_eq!(profiles[0].points(), vec![(0.0, 0.25), (1.0, 0.5)]);
        assert_eq!(profiles[1].label, "0002");
        assert!(profiles[1].is_empty());
    }

    #[test]
    fn points_skip_missing_values() {
        let profile = DayProfile {
            label: "x".into(),
            readings: vec![
                Reading::new(datetime!(2024-01-05 00:30), None),
                Reading::new(datetime!(2024-01-05 00:45), Some(2.0)),
            ],
        };
        assert_eq!(profile.points(), vec![(0.75, 2.0)]);
    }

    #[test]
    fn points_skip_nan_values() {
        let profile = DayProfile {
            label: "x".into(),
            readings: vec![
                Reading::new(datetime!(2024-01-05 00:00), Some(1.0)),
                Reading::new(datetime!(2024-01-05 01:00), Some(f64::NAN)),
                Reading::new(datetime!(2024-01-05 02:00), Some(2.0)),
            ],
        };
        assert_eq!(profile.points(), vec![(0.0, 1.0), (2.0, 2.0)]);
    }
}
