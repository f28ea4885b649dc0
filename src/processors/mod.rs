pub mod daily_aggregator;
pub mod sample_generator;
pub mod threshold_checker;

pub use daily_aggregator::{AggregationMode, AggregationReport, CityAggregation, DailyAggregator};
pub use sample_generator::{GeneratorRanges, SampleGenerator};
pub use threshold_checker::{ThresholdBreach, ThresholdChecker, ThresholdReport};
