//! SQLite persistence for raw samples and daily summaries.
//!
//! A [`WeatherStore`] owns one connection and runs in autocommit mode, so every
//! insert is durable on its own. There is no batch transaction: if an insert
//! fails midway through a call, the rows before it stay in the file.

pub mod samples;
pub mod schema;
pub mod summaries;

pub use schema::{ensure_column, ensure_schema, table_columns};

use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

pub struct WeatherStore {
    conn: Connection,
}

impl WeatherStore {
    /// Open (or create) a file-backed store and make sure the schema is current
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!(path = %path.display(), "Opening weather store");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, e.g. one holding a legacy schema
    pub fn from_connection(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
