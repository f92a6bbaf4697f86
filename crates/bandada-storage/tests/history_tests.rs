// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite history recorder.

use std::collections::BTreeMap;

use bandada_core::types::{
    BatchId, ContactId, ContactSnapshot, HistoryRecord, HistoryStatus,
};
use bandada_core::HistoryRecorder;
use bandada_storage::SqliteHistory;
use chrono::{Duration, Utc};

fn record(batch: &BatchId, contact: &str, status: HistoryStatus) -> HistoryRecord {
    let mut variables = BTreeMap::new();
    variables.insert("{city}".to_string(), vec!["Lima".to_string(), "Quito".to_string()]);
    HistoryRecord {
        batch_id: batch.clone(),
        message: format!("hola {contact}"),
        variables,
        contact: ContactSnapshot {
            id: ContactId(contact.to_string()),
            name: format!("contact {contact}"),
            number: "+5491122334455".to_string(),
        },
        status,
        error_message: match status {
            HistoryStatus::Error => Some("gateway exploded".to_string()),
            _ => None,
        },
        sent_at: Utc::now(),
    }
}

#[tokio::test]
async fn roundtrips_a_record_faithfully() {
    let store = SqliteHistory::open_in_memory().await.expect("open");
    let batch = BatchId::new();
    let original = record(&batch, "a", HistoryStatus::Error);

    store
        .record_batch(&batch, std::slice::from_ref(&original))
        .await
        .expect("record");

    let loaded = store.records_for_batch(&batch).await.expect("load");
    assert_eq!(loaded.len(), 1);
    let got = &loaded[0];
    assert_eq!(got.batch_id, batch);
    assert_eq!(got.message, original.message);
    assert_eq!(got.variables, original.variables);
    assert_eq!(got.contact, original.contact);
    assert_eq!(got.status, HistoryStatus::Error);
    assert_eq!(got.error_message.as_deref(), Some("gateway exploded"));
    // RFC 3339 roundtrip keeps sub-second precision.
    assert_eq!(got.sent_at, original.sent_at);
}

#[tokio::test]
async fn resubmitting_overlapping_records_is_idempotent() {
    let store = SqliteHistory::open_in_memory().await.expect("open");
    let batch = BatchId::new();

    // First flush: contact a pending.
    let first = vec![record(&batch, "a", HistoryStatus::Pending)];
    store.record_batch(&batch, &first).await.expect("flush 1");

    // Retried flush resubmits a (now success) plus a new contact b.
    let second = vec![
        record(&batch, "a", HistoryStatus::Success),
        record(&batch, "b", HistoryStatus::Success),
    ];
    store.record_batch(&batch, &second).await.expect("flush 2");

    let loaded = store.records_for_batch(&batch).await.expect("load");
    assert_eq!(loaded.len(), 2, "upsert must not duplicate rows");
    let a = loaded
        .iter()
        .find(|r| r.contact.id == ContactId("a".into()))
        .expect("contact a");
    assert_eq!(a.status, HistoryStatus::Success, "latest flush wins");
}

#[tokio::test]
async fn all_records_lists_newest_first() {
    let store = SqliteHistory::open_in_memory().await.expect("open");
    let old_batch = BatchId::new();
    let new_batch = BatchId::new();

    let mut old = record(&old_batch, "a", HistoryStatus::Success);
    old.sent_at = Utc::now() - Duration::hours(2);
    let new = record(&new_batch, "b", HistoryStatus::Success);

    store.record_batch(&old_batch, &[old]).await.expect("old");
    store.record_batch(&new_batch, &[new]).await.expect("new");

    let all = store.all_records().await.expect("load");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].batch_id, new_batch);
    assert_eq!(all[1].batch_id, old_batch);
}

#[tokio::test]
async fn records_for_batch_ignores_other_batches() {
    let store = SqliteHistory::open_in_memory().await.expect("open");
    let batch_a = BatchId::new();
    let batch_b = BatchId::new();

    store
        .record_batch(&batch_a, &[record(&batch_a, "a", HistoryStatus::Success)])
        .await
        .expect("a");
    store
        .record_batch(&batch_b, &[record(&batch_b, "b", HistoryStatus::Success)])
        .await
        .expect("b");

    let only_a = store.records_for_batch(&batch_a).await.expect("load");
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].batch_id, batch_a);
}

#[tokio::test]
async fn persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.db");
    let batch = BatchId::new();

    {
        let store = SqliteHistory::open(&path).await.expect("open");
        store
            .record_batch(&batch, &[record(&batch, "a", HistoryStatus::Success)])
            .await
            .expect("record");
    }

    let store = SqliteHistory::open(&path).await.expect("reopen");
    let loaded = store.records_for_batch(&batch).await.expect("load");
    assert_eq!(loaded.len(), 1);
}
