// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`HistoryRecorder`] implementation.
//!
//! All writes go through tokio-rusqlite's single background thread. Do NOT
//! create additional connections for writes.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use bandada_core::traits::history::HistoryRecorder;
use bandada_core::types::{
    BatchId, ContactId, ContactSnapshot, HistoryRecord, HistoryStatus,
};
use bandada_core::BandadaError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS message_history (
    batch_id       TEXT NOT NULL,
    contact_id     TEXT NOT NULL,
    contact_name   TEXT NOT NULL,
    contact_number TEXT NOT NULL,
    message        TEXT NOT NULL,
    variables      TEXT NOT NULL,
    status         TEXT NOT NULL,
    error_message  TEXT,
    sent_at        TEXT NOT NULL,
    PRIMARY KEY (batch_id, contact_id)
);
CREATE INDEX IF NOT EXISTS idx_message_history_sent_at
    ON message_history (sent_at DESC);
";

/// Delivery-record store over a single SQLite database file.
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Open (and create if missing) the history database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BandadaError> {
        let conn = Connection::open(path.as_ref()).await.map_err(persist)?;
        Self::init(conn).await
    }

    /// In-memory store, for tests.
    pub async fn open_in_memory() -> Result<Self, BandadaError> {
        let conn = Connection::open_in_memory().await.map_err(persist)?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, BandadaError> {
        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(persist)?;
        debug!("history database ready");
        Ok(Self { conn })
    }

    /// Every record, newest first.
    pub async fn all_records(&self) -> Result<Vec<HistoryRecord>, BandadaError> {
        self.query(
            "SELECT batch_id, contact_id, contact_name, contact_number,
                    message, variables, status, error_message, sent_at
             FROM message_history ORDER BY sent_at DESC",
            None,
        )
        .await
    }

    /// Records of one dispatch run, in contact order of insertion.
    pub async fn records_for_batch(
        &self,
        batch_id: &BatchId,
    ) -> Result<Vec<HistoryRecord>, BandadaError> {
        self.query(
            "SELECT batch_id, contact_id, contact_name, contact_number,
                    message, variables, status, error_message, sent_at
             FROM message_history WHERE batch_id = ?1 ORDER BY sent_at ASC",
            Some(batch_id.0.clone()),
        )
        .await
    }

    async fn query(
        &self,
        sql: &'static str,
        batch_filter: Option<String>,
    ) -> Result<Vec<HistoryRecord>, BandadaError> {
        let rows: Vec<RawRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql)?;
                let mapped = match batch_filter {
                    Some(batch_id) => stmt.query_map(params![batch_id], RawRow::from_row)?,
                    None => stmt.query_map([], RawRow::from_row)?,
                };
                let mut rows = Vec::new();
                for row in mapped {
                    rows.push(row?);
                }
                Ok(rows)
            })
            .await
            .map_err(persist)?;

        rows.into_iter().map(RawRow::into_record).collect()
    }
}

#[async_trait]
impl HistoryRecorder for SqliteHistory {
    async fn record_batch(
        &self,
        batch_id: &BatchId,
        records: &[HistoryRecord],
    ) -> Result<(), BandadaError> {
        let rows: Vec<RawRow> = records.iter().map(RawRow::from_record).collect::<Result<_, _>>()?;
        let count = rows.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO message_history
                             (batch_id, contact_id, contact_name, contact_number,
                              message, variables, status, error_message, sent_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                         ON CONFLICT (batch_id, contact_id) DO UPDATE SET
                             message = excluded.message,
                             variables = excluded.variables,
                             status = excluded.status,
                             error_message = excluded.error_message,
                             sent_at = excluded.sent_at",
                    )?;
                    for row in &rows {
                        stmt.execute(params![
                            row.batch_id,
                            row.contact_id,
                            row.contact_name,
                            row.contact_number,
                            row.message,
                            row.variables,
                            row.status,
                            row.error_message,
                            row.sent_at,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(persist)?;
        debug!(batch_id = %batch_id, count, "history records upserted");
        Ok(())
    }
}

/// Stringly-typed row, converted at the crate boundary so parse failures
/// become [`BandadaError::Persist`] instead of panics inside the closure.
struct RawRow {
    batch_id: String,
    contact_id: String,
    contact_name: String,
    contact_number: String,
    message: String,
    variables: String,
    status: String,
    error_message: Option<String>,
    sent_at: String,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            batch_id: row.get(0)?,
            contact_id: row.get(1)?,
            contact_name: row.get(2)?,
            contact_number: row.get(3)?,
            message: row.get(4)?,
            variables: row.get(5)?,
            status: row.get(6)?,
            error_message: row.get(7)?,
            sent_at: row.get(8)?,
        })
    }

    fn from_record(record: &HistoryRecord) -> Result<Self, BandadaError> {
        Ok(Self {
            batch_id: record.batch_id.0.clone(),
            contact_id: record.contact.id.0.clone(),
            contact_name: record.contact.name.clone(),
            contact_number: record.contact.number.clone(),
            message: record.message.clone(),
            variables: serde_json::to_string(&record.variables)
                .map_err(|e| persist_box(Box::new(e)))?,
            status: record.status.to_string(),
            error_message: record.error_message.clone(),
            sent_at: record.sent_at.to_rfc3339(),
        })
    }

    fn into_record(self) -> Result<HistoryRecord, BandadaError> {
        let variables: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&self.variables).map_err(|e| persist_box(Box::new(e)))?;
        let status: HistoryStatus = self
            .status
            .parse()
            .map_err(|_| BandadaError::Internal(format!("unknown history status {}", self.status)))?;
        let sent_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&self.sent_at)
            .map_err(|e| persist_box(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(HistoryRecord {
            batch_id: BatchId(self.batch_id),
            message: self.message,
            variables,
            contact: ContactSnapshot {
                id: ContactId(self.contact_id),
                name: self.contact_name,
                number: self.contact_number,
            },
            status,
            error_message: self.error_message,
            sent_at,
        })
    }
}

fn persist(e: tokio_rusqlite::Error) -> BandadaError {
    BandadaError::Persist {
        source: Box::new(e),
    }
}

fn persist_box(source: Box<dyn std::error::Error + Send + Sync>) -> BandadaError {
    BandadaError::Persist { source }
}
