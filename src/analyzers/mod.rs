pub mod summary_analyzer;

pub use summary_analyzer::{SummaryAnalyzer, SummaryStatistics, TemperatureStats};
