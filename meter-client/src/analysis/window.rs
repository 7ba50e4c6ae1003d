use std::collections::BTreeSet;

use time::{Date, Duration};

/// Length of the heatmap window, in days.
pub const WINDOW_DAYS: usize = 100;

/// Find the earliest run of `len` consecutive calendar days in `dates`.
///
/// Input may be unordered and contain duplicates. Returns the dates of the
/// run in ascending order, or `None` when no run of that length exists.
pub fn find_consecutive_window<I>(dates: I, len: usize) -> Option<Vec<Date>>
where
    I: IntoIterator<Item = Date>,
{
    let sorted: Vec<Date> = dates.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if len == 0 || len > sorted.len() {
        return None;
    }
    let span = Duration::days(len as i64 - 1);

    // Distinct and ascending: a slice spanning exactly `len - 1` days has no gaps.
    sorted
        .windows(len)
        .find(|w| w[len - 1] - w[0] == span)
        .map(<[Date]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn run(start: Date, days: i64) -> Vec<Date> {
        (0..days).map(|d| start + Duration::days(d)).collect()
    }

    fn assert_consecutive(window: &[Date]) {
        for pair in window.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn finds_exact_run() {
        let dates = run(date!(2024-01-01), 100);
        let window = find_consecutive_window(dates.clone(), WINDOW_DAYS).unwrap();
        assert_eq!(window, dates);
    }

    #[test]
    fn returns_earliest_start_not_longest() {
        let mut dates = run(date!(2023-01-01), 100);
        dates.extend(run(date!(2024-01-01), 250));

        let window = find_consecutive_window(dates, WINDOW_DAYS).unwrap();
        assert_eq!(window.len(), WINDOW_DAYS);
        assert_eq!(window[0], date!(2023-01-01));
        assert_consecutive(&window);
    }

    #[test]
    fn skips_run_broken_by_a_gap() {
        // 60 days, a one-day gap, then 120 days.
        let mut dates = run(date!(2024-01-01), 60);
        let resume = date!(2024-01-01) + Duration::days(61);
        dates.extend(run(resume, 120));

        let window = find_consecutive_window(dates, WINDOW_DAYS).unwrap();
        assert_eq!(window[0], resume);
        assert_eq!(window[99], resume + Duration::days(99));
        assert_consecutive(&window);
    }

    #[test]
    fn unordered_input_with_duplicates() {
        let mut dates = run(date!(2024-02-01), 100);
        dates.reverse();
        dates.extend(run(date!(2024-02-10), 5));

        let window = find_consecutive_window(dates, WINDOW_DAYS).unwrap();
        assert_eq!(window, run(date!(2024-02-01), 100));
    }

    #[test]
    fn scattered_dates_have_no_window() {
        let dates: Vec<Date> = (0..50).map(|i| date!(2024-01-01) + Duration::days(i * 3)).collect();
        assert_eq!(find_consecutive_window(dates, WINDOW_DAYS), None);
    }

    #[test]
    fn too_few_dates_have_no_window() {
        assert_eq!(find_consecutive_window(run(date!(2024-01-01), 99), WINDOW_DAYS), None);
        assert_eq!(find_consecutive_window(Vec::new(), WINDOW_DAYS), None);
        assert_eq!(find_consecutive_window(run(date!(2024-01-01), 5), 0), None);
    }

    #[test]
    fn oversized_length_has_no_window() {
        let dates = run(date!(2024-01-01), 5);
        assert_eq!(find_consecutive_window(dates.clone(), usize::MAX), None);
        assert_eq!(find_consecutive_window(dates, 6), None);
    }

    #[test]
    fn own_output_round_trips() {
        let mut dates = run(date!(2022-12-15), 40);
        dates.extend(run(date!(2023-03-01), 130));

        let first = find_consecutive_window(dates, WINDOW_DAYS).unwrap();
        let second = find_consecutive_window(first.clone(), WINDOW_DAYS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn crosses_month_and_leap_day_boundaries() {
        let dates = run(date!(2024-02-20), 100);
        let window = find_consecutive_window(dates, WINDOW_DAYS).unwrap();
        assert!(window.contains(&date!(2024-02-29)));
        assert_consecutive(&window);
    }
}
