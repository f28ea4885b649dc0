use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::DailySummary;
use crate::utils::constants::DEFAULT_THRESHOLD_TEMP;

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdBreach {
    pub city: String,
    pub date: NaiveDate,
    pub max_temp: f64,
    pub excess: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ThresholdReport {
    pub threshold: f64,
    pub rows_checked: usize,
    pub breaches: Vec<ThresholdBreach>,
}

impl ThresholdReport {
    pub fn has_breaches(&self) -> bool {
        !self.breaches.is_empty()
    }

    /// Number of distinct days above the threshold per city
    pub fn breach_days_by_city(&self) -> BTreeMap<&str, usize> {
        let mut days: BTreeMap<&str, Vec<NaiveDate>> = BTreeMap::new();
        for breach in &self.breaches {
            let dates = days.entry(breach.city.as_str()).or_default();
            if !dates.contains(&breach.date) {
                dates.push(breach.date);
            }
        }
        days.into_iter().map(|(city, dates)| (city, dates.len())).collect()
    }

    pub fn summary(&self) -> String {
        if !self.has_breaches() {
            return format!(
                "No daily maximum above {:.1}°C in {} summary rows",
                self.threshold, self.rows_checked
            );
        }

        let mut lines = vec![format!(
            "{} summary rows above {:.1}°C:",
            self.breaches.len(),
            self.threshold
        )];
        for (city, days) in self.breach_days_by_city() {
            lines.push(format!("- {}: {} day(s)", city, days));
        }
        lines.join("\n")
    }
}

/// Flags summary rows whose maximum temperature is above an alert threshold.
pub struct ThresholdChecker {
    threshold: f64,
}

impl ThresholdChecker {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_TEMP,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn check(&self, summaries: &[DailySummary]) -> ThresholdReport {
        let breaches = summaries
            .iter()
            .filter(|s| s.exceeds(self.threshold))
            .map(|s| ThresholdBreach {
                city: s.city.clone(),
                date: s.date,
                max_temp: s.max_temp,
                excess: s.max_temp - self.threshold,
            })
            .collect();

        ThresholdReport {
            threshold: self.threshold,
            rows_checked: summaries.len(),
            breaches,
        }
    }
}

impl Default for ThresholdChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;

    fn summary(city: &str, day: u32, max_temp: f64, condition: WeatherCondition) -> DailySummary {
        DailySummary {
            city: city.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            avg_temp: max_temp - 2.0,
            max_temp,
            min_temp: max_temp - 4.0,
            avg_humidity: Some(50.0),
            max_wind_speed: Some(4.0),
            dominant_condition: condition,
            sample_count: Some(1),
        }
    }

    #[test]
    fn test_breaches_above_threshold_only() {
        let rows = vec![
            summary("Delhi", 20, 38.0, WeatherCondition::Clear),
            summary("Delhi", 20, 36.0, WeatherCondition::Rain),
            summary("Delhi", 21, 35.0, WeatherCondition::Clear), // equal is not a breach
            summary("Chennai", 21, 41.5, WeatherCondition::Clouds),
            summary("Mumbai", 21, 30.0, WeatherCondition::Rain),
        ];

        let report = ThresholdChecker::new().check(&rows);

        assert_eq!(report.rows_checked, 5);
        assert_eq!(report.breaches.len(), 3);
        assert_eq!(report.breaches[2].excess, 6.5);

        let by_city = report.breach_days_by_city();
        assert_eq!(by_city.get("Delhi"), Some(&1));
        assert_eq!(by_city.get("Chennai"), Some(&1));
        assert_eq!(by_city.get("Mumbai"), None);
        assert!(report.summary().contains("Delhi: 1 day(s)"));
    }

    #[test]
    fn test_no_breaches() {
        let rows = vec![summary("Delhi", 20, 30.0, WeatherCondition::Clear)];
        let report = ThresholdChecker::with_threshold(40.0).check(&rows);

        assert!(!report.has_breaches());
        assert!(report.summary().starts_with("No daily maximum above 40.0"));
    }
}
