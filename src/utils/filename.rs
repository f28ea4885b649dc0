use chrono::{Datelike, Local};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_EXPORT_DIR;

/// Generate default export filename with format: weather-summary-{YYMMDD}.parquet
pub fn generate_default_export_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100;

    let filename = format!(
        "weather-summary-{:02}{:02}{:02}.parquet",
        year,
        now.month(),
        now.day()
    );
    PathBuf::from(DEFAULT_EXPORT_DIR).join(filename)
}

/// File-system friendly form of a city name, e.g. "New Delhi" -> "new_delhi"
pub fn city_file_stem(city: &str) -> String {
    city.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
