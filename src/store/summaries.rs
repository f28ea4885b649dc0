use chrono::NaiveDate;
use rusqlite::params;

use crate::error::{Result, SimulationError};
use crate::models::{DailySummary, WeatherCondition};
use crate::store::WeatherStore;
use crate::utils::constants::SUMMARY_TABLE;

const SUMMARY_COLUMNS: &str =
    "city, date, avg_temp, max_temp, min_temp, avg_humidity, max_wind_speed, dominant_condition";

type SummaryRow = (
    String,
    NaiveDate,
    f64,
    f64,
    f64,
    Option<f64>,
    Option<f64>,
    String,
);

impl WeatherStore {
    /// Append summary rows in the given order, one autocommitted insert each.
    /// Rows are never deduplicated against earlier runs.
    pub fn insert_summaries(&self, summaries: &[DailySummary]) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO {SUMMARY_TABLE} ({SUMMARY_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        ))?;

        for summary in summaries {
            stmt.execute(params![
                summary.city,
                summary.date,
                summary.avg_temp,
                summary.max_temp,
                summary.min_temp,
                summary.avg_humidity,
                summary.max_wind_speed,
                summary.dominant_condition.as_str(),
            ])?;
        }

        Ok(summaries.len())
    }

    /// Summary rows for one city ordered by date; rows sharing a date keep
    /// their insertion order.
    pub fn summaries_for_city(&self, city: &str) -> Result<Vec<DailySummary>> {
        self.query_summaries(
            &format!(
                "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_TABLE}
                 WHERE city = ?1 ORDER BY date, rowid"
            ),
            Some(city),
        )
    }

    /// Every summary row, grouped by city then date
    pub fn all_summaries(&self) -> Result<Vec<DailySummary>> {
        self.query_summaries(
            &format!("SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_TABLE} ORDER BY city, date, rowid"),
            None,
        )
    }

    pub fn summary_count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {SUMMARY_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn query_summaries(&self, sql: &str, city: Option<&str>) -> Result<Vec<DailySummary>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<SummaryRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ))
        };

        let rows = match city {
            Some(city) => stmt.query_map([city], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
        };

        rows.into_iter().map(summary_from_row).collect()
    }
}

fn summary_from_row(row: SummaryRow) -> Result<DailySummary> {
    let (city, date, avg_temp, max_temp, min_temp, avg_humidity, max_wind_speed, condition) = row;
    let dominant_condition = WeatherCondition::parse(&condition)
        .ok_or(SimulationError::UnknownCondition(condition))?;

    Ok(DailySummary {
        city,
        date,
        avg_temp,
        max_temp,
        min_temp,
        avg_humidity,
        max_wind_speed,
        dominant_condition,
        sample_count: None,
    })
}
