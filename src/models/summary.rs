use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::WeatherCondition;

/// Aggregated statistics for one city over one calendar date.
///
/// Under the default aggregation mode a row covers one (city, date, condition)
/// group, so a single day may be represented by several rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub city: String,
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_humidity: Option<f64>,
    pub max_wind_speed: Option<f64>,
    pub dominant_condition: WeatherCondition,
    /// Samples behind this row. Only known for freshly aggregated rows; the
    /// store does not persist it, so rows read back carry `None`.
    pub sample_count: Option<u32>,
}

impl DailySummary {
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.max_temp > threshold
    }
}
