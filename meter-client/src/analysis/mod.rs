pub mod common_day;
pub mod day_profile;
pub mod pivot;
pub mod window;

pub use common_day::find_common_day;
pub use day_profile::{day_profiles, DayProfile};
pub use pivot::{DailyPivot, HOURS_PER_DAY};
pub use window::{find_consecutive_window, WINDOW_DAYS};
