pub mod analysis;
pub mod domain;

pub use analysis::{
    find_common_day, find_consecutive_window, DailyPivot, DayProfile, HOURS_PER_DAY, WINDOW_DAYS,
};
pub use domain::{MeterSeries, Reading, SourceId, SourceIdError};
