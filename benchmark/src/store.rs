// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Persistence of one result row per run.
//!
//! The row layout matches the shared `benchmark_results` table that other
//! language implementations of the benchmark also write to. Persistence is
//! best-effort: callers log [`StoreError`] and carry on.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::metrics::BenchmarkResult;

/// Timestamp format of the `timestamp` column.
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS benchmark_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT,
    pattern TEXT,
    language TEXT,
    messages INTEGER,
    execution_time_ms REAL,
    average_power_w REAL,
    energy_j REAL
)";

const INSERT_ROW: &str = "INSERT INTO benchmark_results \
    (timestamp, pattern, language, messages, execution_time_ms, average_power_w, energy_j) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open result database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to prepare result table: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Failed to insert result row: {0}")]
    Insert(#[source] rusqlite::Error),

    #[error("Failed to query result rows: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Message count {messages} does not fit the messages column")]
    MessageCount { messages: u64 },
}

/// One persisted benchmark row.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub timestamp: String,
    pub pattern: String,
    pub language: String,
    pub messages: i64,
    pub execution_time_ms: f64,
    /// Filled by an external power measurement; 0.0 otherwise
    pub average_power_w: f64,
    pub energy_j: f64,
}

impl BenchmarkRow {
    /// Build the row for `result`, stamped with `now`.
    ///
    /// Fails with [`StoreError::MessageCount`] when the message count exceeds
    /// the SQLite integer range.
    pub fn from_result(result: &BenchmarkResult, now: DateTime<Local>) -> Result<Self, StoreError> {
        let messages = i64::try_from(result.messages).map_err(|_| StoreError::MessageCount {
            messages: result.messages,
        })?;
        Ok(Self {
            timestamp: now.format(ROW_TIMESTAMP_FORMAT).to_string(),
            pattern: result.pattern.to_string(),
            language: result.language.clone(),
            messages,
            execution_time_ms: result.elapsed_ms,
            average_power_w: result.energy.average_power_w,
            energy_j: result.energy.energy_j,
        })
    }
}

/// Receiver of benchmark rows.
pub trait ResultStore {
    fn insert(&mut self, row: &BenchmarkRow) -> Result<(), StoreError>;
}

/// SQLite-backed result store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source: e,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(CREATE_TABLE, []).map_err(StoreError::Schema)?;
        Ok(Self { conn })
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> Result<Vec<BenchmarkRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT timestamp, pattern, language, messages, execution_time_ms, \
                 average_power_w, energy_j FROM benchmark_results ORDER BY id",
            )
            .map_err(StoreError::Query)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(BenchmarkRow {
                    timestamp: row.get(0)?,
                    pattern: row.get(1)?,
                    language: row.get(2)?,
                    messages: row.get(3)?,
                    execution_time_ms: row.get(4)?,
                    average_power_w: row.get(5)?,
                    energy_j: row.get(6)?,
                })
            })
            .map_err(StoreError::Query)?;

        let collected = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query);
        collected
    }
}

impl ResultStore for SqliteStore {
    fn insert(&mut self, row: &BenchmarkRow) -> Result<(), StoreError> {
        self.conn
            .execute(
                INSERT_ROW,
                params![
                    row.timestamp,
                    row.pattern,
                    row.language,
                    row.messages,
                    row.execution_time_ms,
                    row.average_power_w,
                    row.energy_j,
                ],
            )
            .map_err(StoreError::Insert)?;
        Ok(())
    }
}
