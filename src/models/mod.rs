pub mod sample;
pub mod summary;

pub use sample::{Sample, WeatherCondition};
pub use summary::DailySummary;
