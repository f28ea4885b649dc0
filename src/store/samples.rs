use chrono::NaiveDateTime;
use rusqlite::params;
use validator::Validate;

use crate::error::{Result, SimulationError};
use crate::models::{Sample, WeatherCondition};
use crate::store::{ensure_schema, WeatherStore};
use crate::utils::constants::SAMPLE_TABLE;

type SampleRow = (
    String,
    f64,
    f64,
    Option<f64>,
    Option<f64>,
    String,
    NaiveDateTime,
);

impl WeatherStore {
    /// Append one row per sample; each insert commits on its own.
    ///
    /// Every sample is checked against its physical limits first. An invalid
    /// sample stops the call, leaving the rows before it stored.
    pub fn insert_samples(&self, samples: &[Sample]) -> Result<usize> {
        ensure_schema(&self.conn)?;

        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO {SAMPLE_TABLE} (city, temp, feels_like, humidity, wind_speed, main, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))?;

        for sample in samples {
            sample.validate()?;
            stmt.execute(params![
                sample.city,
                sample.temperature,
                sample.feels_like,
                sample.humidity,
                sample.wind_speed,
                sample.condition.as_str(),
                sample.timestamp,
            ])?;
        }

        Ok(samples.len())
    }

    /// All stored samples for a city, oldest first
    pub fn samples_for_city(&self, city: &str) -> Result<Vec<Sample>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT city, temp, feels_like, humidity, wind_speed, main, timestamp
             FROM {SAMPLE_TABLE} WHERE city = ?1 ORDER BY timestamp"
        ))?;

        let rows = stmt
            .query_map([city], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<SampleRow>>>()?;

        rows.into_iter().map(sample_from_row).collect()
    }

    /// Number of stored samples, for one city or for all of them
    pub fn sample_count(&self, city: Option<&str>) -> Result<u64> {
        let count: i64 = match city {
            Some(city) => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {SAMPLE_TABLE} WHERE city = ?1"),
                [city],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {SAMPLE_TABLE}"),
                [],
                |row| row.get(0),
            )?,
        };
        Ok(count as u64)
    }
}

fn sample_from_row(row: SampleRow) -> Result<Sample> {
    let (city, temperature, feels_like, humidity, wind_speed, main, timestamp) = row;
    let condition =
        WeatherCondition::parse(&main).ok_or(SimulationError::UnknownCondition(main))?;

    Ok(Sample {
        city,
        temperature,
        feels_like,
        humidity,
        wind_speed,
        condition,
        timestamp,
    })
}
