use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::Result;
use crate::models::{DailySummary, Sample, WeatherCondition};
use crate::store::WeatherStore;
use crate::utils::progress::ProgressReporter;

/// How samples are partitioned before statistics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// One row per (date, condition). Each row's dominant condition is simply
    /// its own condition, so a city-day with several conditions yields several rows.
    #[default]
    PerCondition,
    /// One row per date; the dominant condition is the most frequent one that
    /// day, ties going to the alphabetically first label.
    DailyMode,
}

/// Running statistics for one group. Built from its first sample, so a group
/// is never empty.
struct GroupAccumulator {
    count: u32,
    temp_sum: f64,
    temp_max: f64,
    temp_min: f64,
    humidity_sum: f64,
    humidity_count: u32,
    wind_max: Option<f64>,
    first_condition: WeatherCondition,
    conditions: BTreeMap<&'static str, (WeatherCondition, u32)>,
}

impl GroupAccumulator {
    fn new(sample: &Sample) -> Self {
        let mut acc = Self {
            count: 0,
            temp_sum: 0.0,
            temp_max: sample.temperature,
            temp_min: sample.temperature,
            humidity_sum: 0.0,
            humidity_count: 0,
            wind_max: None,
            first_condition: sample.condition,
            conditions: BTreeMap::new(),
        };
        acc.add(sample);
        acc
    }

    fn add(&mut self, sample: &Sample) {
        self.count += 1;
        self.temp_sum += sample.temperature;
        self.temp_max = self.temp_max.max(sample.temperature);
        self.temp_min = self.temp_min.min(sample.temperature);

        // SQL AVG/MAX semantics: nulls are skipped
        if let Some(humidity) = sample.humidity {
            self.humidity_sum += humidity;
            self.humidity_count += 1;
        }
        if let Some(wind) = sample.wind_speed {
            self.wind_max = Some(self.wind_max.map_or(wind, |w| w.max(wind)));
        }

        self.conditions
            .entry(sample.condition.as_str())
            .or_insert((sample.condition, 0))
            .1 += 1;
    }

    fn dominant_condition(&self) -> WeatherCondition {
        let mut dominant = (self.first_condition, 0);
        for &(condition, count) in self.conditions.values() {
            if count > dominant.1 {
                dominant = (condition, count);
            }
        }
        dominant.0
    }

    fn finish(self, city: &str, date: NaiveDate) -> DailySummary {
        let avg_humidity = if self.humidity_count > 0 {
            Some(self.humidity_sum / f64::from(self.humidity_count))
        } else {
            None
        };

        DailySummary {
            city: city.to_string(),
            date,
            avg_temp: self.temp_sum / f64::from(self.count),
            max_temp: self.temp_max,
            min_temp: self.temp_min,
            avg_humidity,
            max_wind_speed: self.wind_max,
            dominant_condition: self.dominant_condition(),
            sample_count: Some(self.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityAggregation {
    pub city: String,
    pub samples: u64,
    pub rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    pub cities: Vec<CityAggregation>,
    pub summaries: Vec<DailySummary>,
}

impl AggregationReport {
    pub fn total_rows(&self) -> usize {
        self.summaries.len()
    }

    pub fn total_samples(&self) -> u64 {
        self.cities.iter().map(|c| c.samples).sum()
    }
}

pub struct DailyAggregator {
    mode: AggregationMode,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self {
            mode: AggregationMode::default(),
        }
    }

    pub fn with_mode(mode: AggregationMode) -> Self {
        Self { mode }
    }

    /// Roll a city's samples up into summary rows.
    ///
    /// Rows come out ordered by date ascending, then sample count descending,
    /// then condition label ascending. `samples` is assumed to belong to `city`.
    pub fn summarize(&self, city: &str, samples: &[Sample]) -> Vec<DailySummary> {
        let mut groups: HashMap<(NaiveDate, Option<WeatherCondition>), GroupAccumulator> =
            HashMap::new();

        for sample in samples {
            let key = match self.mode {
                AggregationMode::PerCondition => (sample.date(), Some(sample.condition)),
                AggregationMode::DailyMode => (sample.date(), None),
            };

            groups
                .entry(key)
                .and_modify(|acc| acc.add(sample))
                .or_insert_with(|| GroupAccumulator::new(sample));
        }

        let mut summaries: Vec<DailySummary> = groups
            .into_iter()
            .map(|((date, _), acc)| acc.finish(city, date))
            .collect();

        summaries.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| b.sample_count.cmp(&a.sample_count))
                .then_with(|| {
                    a.dominant_condition
                        .as_str()
                        .cmp(b.dominant_condition.as_str())
                })
        });

        summaries
    }

    /// Summarize one city's stored samples and append the rows to the store
    pub fn aggregate_city(&self, store: &WeatherStore, city: &str) -> Result<Vec<DailySummary>> {
        let samples = store.samples_for_city(city)?;
        if samples.is_empty() {
            debug!(city, "No samples stored, skipping aggregation");
            return Ok(Vec::new());
        }

        let summaries = self.summarize(city, &samples);
        store.insert_summaries(&summaries)?;

        debug!(
            city,
            samples = samples.len(),
            rows = summaries.len(),
            "Aggregated daily summaries"
        );
        Ok(summaries)
    }

    pub fn aggregate_all(
        &self,
        store: &WeatherStore,
        cities: &[String],
        progress: Option<&ProgressReporter>,
    ) -> Result<AggregationReport> {
        let mut report = AggregationReport::default();

        for city in cities {
            if let Some(p) = progress {
                p.set_message(&format!("Aggregating {}", city));
            }

            let summaries = self.aggregate_city(store, city)?;
            report.cities.push(CityAggregation {
                city: city.clone(),
                samples: summaries
                    .iter()
                    .filter_map(|s| s.sample_count)
                    .map(u64::from)
                    .sum(),
                rows: summaries.len(),
            });
            report.summaries.extend(summaries);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        Ok(report)
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::SampleGenerator;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample(day: u32, hour: u32, temperature: f64, condition: WeatherCondition) -> Sample {
        Sample::new(
            "Delhi".to_string(),
            temperature,
            temperature,
            50.0,
            5.0,
            condition,
            at(day, hour),
        )
    }

    #[test]
    fn test_group_statistics() {
        let samples = vec![
            Sample {
                humidity: Some(40.0),
                wind_speed: Some(3.0),
                ..sample(20, 6, 20.0, WeatherCondition::Clear)
            },
            Sample {
                humidity: Some(60.0),
                wind_speed: Some(9.0),
                ..sample(20, 12, 30.0, WeatherCondition::Clear)
            },
            Sample {
                humidity: Some(80.0),
                wind_speed: Some(6.0),
                ..sample(20, 18, 40.0, WeatherCondition::Clear)
            },
        ];

        let summaries = DailyAggregator::new().summarize("Delhi", &samples);

        assert_eq!(
            summaries,
            vec![DailySummary {
                city: "Delhi".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 10, 20).unwrap(),
                avg_temp: 30.0,
                max_temp: 40.0,
                min_temp: 20.0,
                avg_humidity: Some(60.0),
                max_wind_speed: Some(9.0),
                dominant_condition: WeatherCondition::Clear,
                sample_count: Some(3),
            }]
        );
    }

    #[test]
    fn test_per_condition_rows_and_order() {
        let samples = vec![
            sample(21, 9, 25.0, WeatherCondition::Rain),
            sample(20, 9, 30.0, WeatherCondition::Rain),
            sample(20, 10, 32.0, WeatherCondition::Clear),
            sample(20, 11, 34.0, WeatherCondition::Clear),
            sample(20, 12, 28.0, WeatherCondition::Drizzle),
            sample(20, 13, 29.0, WeatherCondition::Clouds),
        ];

        let summaries = DailyAggregator::new().summarize("Delhi", &samples);
        let order: Vec<(u32, WeatherCondition, u32)> = summaries
            .iter()
            .map(|s| {
                (
                    chrono::Datelike::day(&s.date),
                    s.dominant_condition,
                    s.sample_count.unwrap_or(0),
                )
            })
            .collect();

        assert_eq!(
            order,
            vec![
                (20, WeatherCondition::Clear, 2),
                // Single-sample ties fall back to label order
                (20, WeatherCondition::Clouds, 1),
                (20, WeatherCondition::Drizzle, 1),
                (20, WeatherCondition::Rain, 1),
                (21, WeatherCondition::Rain, 1),
            ]
        );

        // Each row only covers its own condition's samples
        assert_eq!(summaries[0].avg_temp, 33.0);
        assert_eq!(summaries[0].min_temp, 32.0);
    }

    #[test]
    fn test_daily_mode_picks_most_frequent_condition() {
        let samples = vec![
            sample(20, 9, 30.0, WeatherCondition::Rain),
            sample(20, 10, 32.0, WeatherCondition::Thunderstorm),
            sample(20, 11, 34.0, WeatherCondition::Thunderstorm),
            sample(21, 9, 26.0, WeatherCondition::Rain),
            sample(21, 10, 28.0, WeatherCondition::Drizzle),
        ];

        let summaries =
            DailyAggregator::with_mode(AggregationMode::DailyMode).summarize("Delhi", &samples);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].dominant_condition, WeatherCondition::Thunderstorm);
        assert_eq!(summaries[0].sample_count, Some(3));
        assert_eq!(summaries[0].avg_temp, 32.0);
        // Drizzle and Rain tie; label order decides
        assert_eq!(summaries[1].dominant_condition, WeatherCondition::Drizzle);
    }

    #[test]
    fn test_null_readings_are_skipped() {
        let samples = vec![
            Sample {
                humidity: None,
                wind_speed: None,
                ..sample(20, 9, 30.0, WeatherCondition::Clear)
            },
            Sample {
                humidity: Some(70.0),
                wind_speed: None,
                ..sample(20, 10, 31.0, WeatherCondition::Clear)
            },
        ];

        let summaries = DailyAggregator::new().summarize("Delhi", &samples);
        assert_eq!(summaries[0].avg_humidity, Some(70.0));
        assert_eq!(summaries[0].max_wind_speed, None);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(DailyAggregator::new().summarize("Delhi", &[]).is_empty());
    }

    #[test]
    fn test_sample_counts_are_conserved() {
        let generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut samples = generator.generate("Delhi", 30, at(20, 12), &mut rng);
        samples.extend(generator.generate("Delhi", 30, at(20, 18), &mut rng));

        for mode in [AggregationMode::PerCondition, AggregationMode::DailyMode] {
            let summaries = DailyAggregator::with_mode(mode).summarize("Delhi", &samples);
            let total: u32 = summaries.iter().filter_map(|s| s.sample_count).sum();
            assert_eq!(total as usize, samples.len());
        }
    }

    #[test]
    fn test_aggregate_city_writes_rows() -> Result<()> {
        let store = WeatherStore::open_in_memory()?;
        store.insert_samples(&[
            sample(20, 9, 30.0, WeatherCondition::Rain),
            sample(20, 10, 32.0, WeatherCondition::Clear),
        ])?;

        let aggregator = DailyAggregator::new();
        let rows = aggregator.aggregate_city(&store, "Delhi")?;

        assert_eq!(rows.len(), 2);

        // Everything but the in-memory count survives the round trip
        let expected: Vec<DailySummary> = rows
            .into_iter()
            .map(|row| DailySummary {
                sample_count: None,
                ..row
            })
            .collect();
        assert_eq!(store.summaries_for_city("Delhi")?, expected);
        Ok(())
    }

    #[test]
    fn test_city_without_samples_produces_nothing() -> Result<()> {
        let store = WeatherStore::open_in_memory()?;
        store.insert_samples(&[sample(20, 9, 30.0, WeatherCondition::Rain)])?;

        let report = DailyAggregator::new().aggregate_all(
            &store,
            &["Delhi".to_string(), "Mumbai".to_string()],
            None,
        )?;

        assert_eq!(report.total_rows(), 1);
        assert_eq!(report.total_samples(), 1);
        assert_eq!(
            report.cities[1],
            CityAggregation {
                city: "Mumbai".to_string(),
                samples: 0,
                rows: 0,
            }
        );
        assert!(store.summaries_for_city("Mumbai")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: AggregationMode = serde_json::from_str("\"daily_mode\"").unwrap();
        assert_eq!(mode, AggregationMode::DailyMode);
        assert_eq!(
            serde_json::to_string(&AggregationMode::PerCondition).unwrap(),
            "\"per_condition\""
        );
    }
}
