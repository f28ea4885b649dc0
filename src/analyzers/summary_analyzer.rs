use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SimulationError};
use crate::models::DailySummary;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatistics {
    pub total_rows: usize,
    pub total_samples: u64,
    pub cities: Vec<String>,
    pub date_range: (NaiveDate, NaiveDate),
    pub temperature_stats: TemperatureStats,
    pub condition_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureStats {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub min_temp_location: String,
    pub max_temp_location: String,
}

pub struct SummaryAnalyzer;

impl SummaryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, summaries: &[DailySummary]) -> Result<SummaryStatistics> {
        let first = summaries
            .first()
            .ok_or_else(|| SimulationError::MissingData("No daily summaries to analyze".to_string()))?;

        let mut cities = BTreeSet::new();
        let mut min_date = first.date;
        let mut max_date = first.date;
        let mut min_temp = f64::INFINITY;
        let mut max_temp = f64::NEG_INFINITY;
        let mut min_temp_location = String::new();
        let mut max_temp_location = String::new();
        let mut weighted_sum = 0.0;
        let mut total_samples = 0u64;
        let mut condition_counts: BTreeMap<String, u64> = BTreeMap::new();

        for summary in summaries {
            cities.insert(summary.city.clone());
            min_date = min_date.min(summary.date);
            max_date = max_date.max(summary.date);

            if summary.min_temp < min_temp {
                min_temp = summary.min_temp;
                min_temp_location = format!("{} ({})", summary.city, summary.date);
            }
            if summary.max_temp > max_temp {
                max_temp = summary.max_temp;
                max_temp_location = format!("{} ({})", summary.city, summary.date);
            }

            // Rows read back from the store have no count and weigh as one
            let weight = u64::from(summary.sample_count.unwrap_or(1));
            weighted_sum += summary.avg_temp * weight as f64;
            total_samples += weight;

            *condition_counts
                .entry(summary.dominant_condition.to_string())
                .or_default() += weight;
        }

        Ok(SummaryStatistics {
            total_rows: summaries.len(),
            total_samples,
            cities: cities.into_iter().collect(),
            date_range: (min_date, max_date),
            temperature_stats: TemperatureStats {
                min_temp,
                max_temp,
                avg_temp: weighted_sum / total_samples as f64,
                min_temp_location,
                max_temp_location,
            },
            condition_counts,
        })
    }
}

impl Default for SummaryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Cities: {} ({})\n\
            Date Range: {} to {} ({} days)\n\
            Summary rows: {} covering {} samples\n\
            Temperature Range: {:.1}°C to {:.1}°C",
            self.cities.len(),
            self.cities.join(", "),
            self.date_range.0,
            self.date_range.1,
            self.date_range
                .1
                .signed_duration_since(self.date_range.0)
                .num_days()
                + 1,
            self.total_rows,
            self.total_samples,
            self.temperature_stats.min_temp,
            self.temperature_stats.max_temp,
        )
    }

    pub fn detailed_summary(&self) -> String {
        let conditions = self
            .condition_counts
            .iter()
            .map(|(condition, count)| {
                format!(
                    "- {}: {} ({:.1}%)",
                    condition,
                    count,
                    *count as f64 / self.total_samples as f64 * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\n\
            Extreme Temperatures:\n\
            - Coldest: {:.1}°C at {}\n\
            - Hottest: {:.1}°C at {}\n\
            - Average: {:.1}°C\n\n\
            Conditions (by sample):\n{}",
            self.summary(),
            self.temperature_stats.min_temp,
            self.temperature_stats.min_temp_location,
            self.temperature_stats.max_temp,
            self.temperature_stats.max_temp_location,
            self.temperature_stats.avg_temp,
            conditions
        )
    }
}
