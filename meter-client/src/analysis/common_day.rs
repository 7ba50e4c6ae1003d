use std::collections::BTreeSet;

use time::Date;

/// Earliest date present in every one of `sets`.
///
/// Returns `None` when the intersection is empty or no sets are given.
pub fn find_common_day<'a, I>(sets: I) -> Option<Date>
where
    I: IntoIterator<Item = &'a BTreeSet<Date>>,
{
    let mut sets = sets.into_iter();
    let mut common = sets.next()?.clone();

    for set in sets {
        common.retain(|day| set.contains(day));
        if common.is_empty() {
            return None;
        }
    }

    common.first().copied()
}
