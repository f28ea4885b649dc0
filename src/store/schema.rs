use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::utils::constants::{SAMPLE_TABLE, SUMMARY_TABLE};

/// Columns introduced after the first schema version, in the order they
/// are migrated: (table, column, declaration)
const ADDED_COLUMNS: [(&str, &str, &str); 4] = [
    (SAMPLE_TABLE, "humidity", "REAL"),
    (SAMPLE_TABLE, "wind_speed", "REAL"),
    (SUMMARY_TABLE, "avg_humidity", "REAL"),
    (SUMMARY_TABLE, "max_wind_speed", "REAL"),
];

/// Create both tables if absent, then bring older layouts up to date.
///
/// Safe to call any number of times; once the schema is current it is a no-op.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {SAMPLE_TABLE} (
            city TEXT,
            temp REAL,
            feels_like REAL,
            humidity REAL,
            wind_speed REAL,
            main TEXT,
            timestamp TEXT
        );
        CREATE TABLE IF NOT EXISTS {SUMMARY_TABLE} (
            city TEXT,
            avg_temp REAL,
            max_temp REAL,
            min_temp REAL,
            avg_humidity REAL,
            max_wind_speed REAL,
            dominant_condition TEXT,
            date TEXT
        );"
    ))?;

    for (table, column, decl) in ADDED_COLUMNS {
        if ensure_column(conn, table, column, decl)? {
            info!(table, column, "Migrated table: added missing column");
        }
    }

    Ok(())
}

/// Add `column` to `table` unless it is already there.
///
/// Returns `true` when the column was added. Identifiers are spliced into the
/// statement, so they must come from internal constants.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, decl: &str) -> Result<bool> {
    if table_columns(conn, table)?.iter().any(|c| c == column) {
        return Ok(false);
    }

    conn.execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"), [])?;
    Ok(true)
}

/// Column names of `table` in declaration order (empty if the table is absent)
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}
