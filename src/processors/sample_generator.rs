use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;

use crate::models::{Sample, WeatherCondition};
use crate::utils::constants::{FEELS_LIKE_SPREAD, HUMIDITY_RANGE, TEMP_RANGE, WIND_SPEED_RANGE};

/// Uniform ranges the generator draws from, as (min, max) pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorRanges {
    pub temperature: (f64, f64),
    pub feels_like_spread: f64,
    pub humidity: (f64, f64),
    pub wind_speed: (f64, f64),
}

impl Default for GeneratorRanges {
    fn default() -> Self {
        Self {
            temperature: TEMP_RANGE,
            feels_like_spread: FEELS_LIKE_SPREAD,
            humidity: HUMIDITY_RANGE,
            wind_speed: WIND_SPEED_RANGE,
        }
    }
}

pub struct SampleGenerator {
    ranges: GeneratorRanges,
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self {
            ranges: GeneratorRanges::default(),
        }
    }

    pub fn with_ranges(ranges: GeneratorRanges) -> Self {
        Self { ranges }
    }

    /// One sample per simulated day, stepping back from `now` a whole day at a time.
    ///
    /// Every field is drawn independently; the caller owns the clock and the RNG.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        city: &str,
        days: u32,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Vec<Sample> {
        (0..days)
            .map(|day| {
                let timestamp = now - Duration::days(i64::from(day));
                self.sample(city, timestamp, rng)
            })
            .collect()
    }

    /// Unseeded generation against the local clock
    pub fn generate_now(&self, city: &str, days: u32) -> Vec<Sample> {
        self.generate(city, days, Local::now().naive_local(), &mut rand::rng())
    }

    fn sample<R: Rng + ?Sized>(&self, city: &str, timestamp: NaiveDateTime, rng: &mut R) -> Sample {
        let (temp_min, temp_max) = self.ranges.temperature;
        let (humidity_min, humidity_max) = self.ranges.humidity;
        let (wind_min, wind_max) = self.ranges.wind_speed;
        let spread = self.ranges.feels_like_spread;

        let temperature = rng.random_range(temp_min..=temp_max);
        let feels_like = temperature + rng.random_range(-spread..=spread);
        let humidity = rng.random_range(humidity_min..=humidity_max);
        let wind_speed = rng.random_range(wind_min..=wind_max);
        let condition = WeatherCondition::ALL[rng.random_range(0..WeatherCondition::ALL.len())];

        Sample::new(
            city.to_string(),
            temperature,
            feels_like,
            humidity,
            wind_speed,
            condition,
            timestamp,
        )
    }
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use validator::Validate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_values_within_ranges() {
        let generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(42);

        let samples = generator.generate("Delhi", 500, now(), &mut rng);
        assert_eq!(samples.len(), 500);

        for sample in &samples {
            assert_eq!(sample.city, "Delhi");
            assert!((20.0..=45.0).contains(&sample.temperature));
            assert!((sample.feels_like - sample.temperature).abs() <= 2.0 + 1e-9);
            assert!((30.0..=90.0).contains(&sample.humidity.unwrap()));
            assert!((1.0..=15.0).contains(&sample.wind_speed.unwrap()));
            assert!(WeatherCondition::ALL.contains(&sample.condition));
            assert!(sample.validate().is_ok());
        }
    }

    #[test]
    fn test_timestamps_step_back_one_day() {
        let generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);

        let samples = generator.generate("Mumbai", 7, now(), &mut rng);

        assert_eq!(samples[0].timestamp, now());
        for pair in samples.windows(2) {
            assert_eq!(pair[0].timestamp - pair[1].timestamp, Duration::days(1));
        }

        let dates: HashSet<_> = samples.iter().map(|s| s.date()).collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(samples[6].date(), NaiveDate::from_ymd_opt(2024, 10, 14).unwrap());
    }

    #[test]
    fn test_zero_days_is_empty() {
        let generator = SampleGenerator::new();
        assert!(generator.generate_now("Chennai", 0).is_empty());
    }

    #[test]
    fn test_same_seed_same_samples() {
        let generator = SampleGenerator::new();
        let a = generator.generate("Kolkata", 10, now(), &mut StdRng::seed_from_u64(99));
        let b = generator.generate("Kolkata", 10, now(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_ranges() {
        let generator = SampleGenerator::with_ranges(GeneratorRanges {
            temperature: (-5.0, 0.0),
            feels_like_spread: 0.0,
            humidity: (95.0, 100.0),
            wind_speed: (0.0, 1.0),
        });
        let mut rng = StdRng::seed_from_u64(1);

        for sample in generator.generate("Bangalore", 50, now(), &mut rng) {
            assert!((-5.0..=0.0).contains(&sample.temperature));
            assert_eq!(sample.feels_like, sample.temperature);
            assert!(sample.humidity.unwrap() >= 95.0);
        }
    }
}
