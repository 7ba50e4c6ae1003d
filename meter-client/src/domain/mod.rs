pub mod meter_series;
pub mod reading;
pub mod source_id;

pub use meter_series::MeterSeries;
pub use reading::Reading;
pub use source_id::{SourceId, SourceIdError};
