// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for dispatch history.
//!
//! Provides WAL-mode SQLite storage with a single-writer concurrency model
//! via `tokio-rusqlite`. The recorder upserts by `(batch_id, contact_id)`,
//! which makes retried flushes from the engine idempotent.

pub mod history;

pub use history::SqliteHistory;
