use time::{Date, PrimitiveDateTime};

/// One row of a meter's consumption file.
///
/// `kwh` is `None` when the consumption cell was empty; the reading still
/// counts towards the meter's set of observed dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub ts: PrimitiveDateTime,
    pub kwh: Option<f64>,
}

impl Reading {
    pub fn new(ts: PrimitiveDateTime, kwh: Option<f64>) -> Self {
        Self { ts, kwh }
    }

    pub fn date(&self) -> Date {
        self.ts.date()
    }

    pub fn hour(&self) -> u8 {
        self.ts.hour()
    }

    /// Time of day as fractional hours, e.g. 13:30 -> 13.5.
    pub fn hour_of_day(&self) -> f64 {
        f64::from(self.ts.hour()) + f64::from(self.ts.minute()) / 60.0
    }
}
