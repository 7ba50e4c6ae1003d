pub mod series;

pub use series::SeriesSink;
