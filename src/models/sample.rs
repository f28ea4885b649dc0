use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Clear,
        WeatherCondition::Clouds,
        WeatherCondition::Rain,
        WeatherCondition::Drizzle,
        WeatherCondition::Thunderstorm,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Clear" => Some(WeatherCondition::Clear),
            "Clouds" => Some(WeatherCondition::Clouds),
            "Rain" => Some(WeatherCondition::Rain),
            "Drizzle" => Some(WeatherCondition::Drizzle),
            "Thunderstorm" => Some(WeatherCondition::Thunderstorm),
            _ => None,
        }
    }

    /// Label as stored in the `main` / `dominant_condition` columns
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One synthetic observation for a city at a point in time.
///
/// `humidity` and `wind_speed` are optional only because rows written by the
/// first schema version lack those columns; generated samples always carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Sample {
    #[validate(length(min = 1))]
    pub city: String,

    // Physical limits, not the simulation ranges
    #[validate(range(min = -90.0, max = 60.0))]
    pub temperature: f64,

    #[validate(range(min = -90.0, max = 60.0))]
    pub feels_like: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,

    #[validate(range(min = 0.0, max = 120.0))]
    pub wind_speed: Option<f64>,

    pub condition: WeatherCondition,
    pub timestamp: NaiveDateTime,
}

impl Sample {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        city: String,
        temperature: f64,
        feels_like: f64,
        humidity: f64,
        wind_speed: f64,
        condition: WeatherCondition,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            city,
            temperature,
            feels_like,
            humidity: Some(humidity),
            wind_speed: Some(wind_speed),
            condition,
            timestamp,
        }
    }

    /// Calendar date the sample falls on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
