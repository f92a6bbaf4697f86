// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History recorder trait for delivery-record persistence.

use async_trait::async_trait;

use crate::error::BandadaError;
use crate::types::{BatchId, HistoryRecord};

/// Persistence contract for dispatch outcomes.
///
/// The engine flushes the records accumulated since the last successful
/// flush after every batch, and retries a failed flush at the next batch
/// boundary. Implementations MUST upsert by `(batch_id, contact.id)` so a
/// retried flush that overlaps an earlier one cannot duplicate rows.
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    /// Persist one flush worth of records for the given run.
    async fn record_batch(
        &self,
        batch_id: &BatchId,
        records: &[HistoryRecord],
    ) -> Result<(), BandadaError>;
}
