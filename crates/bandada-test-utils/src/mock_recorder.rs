// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock history recorder for deterministic testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bandada_core::traits::history::HistoryRecorder;
use bandada_core::types::{BatchId, HistoryRecord};
use bandada_core::BandadaError;

/// Captures every `record_batch` call; can be scripted to fail the next N
/// flushes to exercise the engine's retry path.
#[derive(Default)]
pub struct MockRecorder {
    calls: Arc<Mutex<Vec<(BatchId, Vec<HistoryRecord>)>>>,
    failures_remaining: Arc<Mutex<u32>>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` flushes fail with a persistence error.
    pub async fn fail_next(&self, count: u32) {
        *self.failures_remaining.lock().await = count;
    }

    /// All captured flushes, in call order.
    pub async fn calls(&self) -> Vec<(BatchId, Vec<HistoryRecord>)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl HistoryRecorder for MockRecorder {
    async fn record_batch(
        &self,
        batch_id: &BatchId,
        records: &[HistoryRecord],
    ) -> Result<(), BandadaError> {
        let mut remaining = self.failures_remaining.lock().await;
        if *remaining > 0 {
            *remaining -= 1;
            return Err(BandadaError::Persist {
                source: Box::new(std::io::Error::other("scripted flush failure")),
            });
        }
        drop(remaining);
        self.calls
            .lock()
            .await
            .push((batch_id.clone(), records.to_vec()));
        Ok(())
    }
}
