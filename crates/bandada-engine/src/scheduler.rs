// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The batch dispatch scheduler.
//!
//! A single control task walks the contact list in fixed-size batches,
//! invoking the gateway once per contact and sleeping between messages and
//! between batches. Sends are deliberately sequential: the design trades
//! throughput for gateway rate-limit compliance. Per-contact failures are
//! recovered locally and never abort the run; history flush failures are
//! retried at the next flush boundary. Cancellation is checked before each
//! send and before each pause.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bandada_core::template;
use bandada_core::types::{
    BatchId, Contact, HistoryRecord, HistoryStatus, MessagePayload, MessageVariable,
    SendingConfig,
};
use bandada_core::{HistoryRecorder, MessageGateway};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::job::DispatchJob;
use crate::progress::{DispatchHandle, ProgressTracker};

/// Terminal description of one dispatch run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub batch_id: BatchId,
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    /// True when the run was stopped by the cancellation token before
    /// reaching the last contact.
    pub cancelled: bool,
    /// False when the final history flush still had unpersisted records.
    pub history_flushed: bool,
}

/// Drives dispatch runs against a gateway and a history recorder.
pub struct Dispatcher {
    gateway: Arc<dyn MessageGateway>,
    recorder: Arc<dyn HistoryRecorder>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn MessageGateway>, recorder: Arc<dyn HistoryRecorder>) -> Self {
        Self { gateway, recorder }
    }

    /// Start one run on a background task.
    ///
    /// Returns the observer handle plus the join handle resolving to the
    /// run's [`RunSummary`]. The job was validated at construction, so the
    /// run itself cannot fail; individual outcomes land in the summary.
    pub fn dispatch(
        &self,
        job: DispatchJob,
        cancel: CancellationToken,
    ) -> (DispatchHandle, JoinHandle<RunSummary>) {
        let (tracker, handle) = ProgressTracker::new(
            job.total(),
            job.total_batches(),
            job.estimate_remaining_secs(job.total()),
        );
        let gateway = Arc::clone(&self.gateway);
        let recorder = Arc::clone(&self.recorder);
        let task = tokio::spawn(run(job, gateway, recorder, tracker, cancel));
        (handle, task)
    }
}

async fn run(
    job: DispatchJob,
    gateway: Arc<dyn MessageGateway>,
    recorder: Arc<dyn HistoryRecorder>,
    mut tracker: ProgressTracker,
    cancel: CancellationToken,
) -> RunSummary {
    let batch_id = job.batch_id().clone();
    let config = *job.config();
    let batch_size = config.batch_size as usize;
    let total = job.total();
    let total_batches = job.total_batches();

    info!(
        batch_id = %batch_id,
        gateway = gateway.name(),
        total,
        total_batches,
        "dispatch run started"
    );

    let variables_snapshot = snapshot_variables(job.variables());
    let mut unflushed: Vec<HistoryRecord> = Vec::new();
    let mut cancelled = false;

    'run: for (batch_index, batch) in job.contacts().chunks(batch_size).enumerate() {
        let contacts_remaining = total - batch_index * batch_size;
        tracker.batch_started(
            batch_index + 1,
            job.estimate_remaining_secs(contacts_remaining),
        );
        debug!(batch = batch_index + 1, size = batch.len(), "batch started");

        for contact in batch {
            if cancel.is_cancelled() {
                cancelled = true;
                break 'run;
            }

            tracker.contact_pending(contact);
            let (outcome, history_message) =
                send_one(gateway.as_ref(), &job, contact, &config).await;

            let variables = match job.payload() {
                MessagePayload::Text { .. } => variables_snapshot.clone(),
                _ => BTreeMap::new(),
            };
            match outcome {
                Ok(()) => {
                    tracker.contact_sent(contact);
                    unflushed.push(make_record(
                        &batch_id,
                        contact,
                        history_message,
                        variables,
                        HistoryStatus::Success,
                        None,
                    ));
                }
                Err(error_text) => {
                    warn!(
                        contact = contact.name.as_str(),
                        error = error_text.as_str(),
                        "send failed, continuing with next contact"
                    );
                    tracker.contact_failed(contact, &error_text);
                    unflushed.push(make_record(
                        &batch_id,
                        contact,
                        history_message,
                        variables,
                        HistoryStatus::Error,
                        Some(error_text),
                    ));
                }
            }

            // Pace after every contact, success or failure alike.
            if !pause(&cancel, Duration::from_secs(config.message_delay_secs)).await {
                cancelled = true;
                break 'run;
            }
        }

        flush_history(recorder.as_ref(), &batch_id, &mut unflushed, &mut tracker).await;

        let more_batches = (batch_index + 1) * batch_size < total;
        if more_batches && !pause(&cancel, Duration::from_secs(config.batch_delay_secs)).await {
            cancelled = true;
            break 'run;
        }
    }

    // Covers a cancelled run mid-batch and a failed last flush.
    if !unflushed.is_empty() {
        flush_history(recorder.as_ref(), &batch_id, &mut unflushed, &mut tracker).await;
    }

    let summary = RunSummary {
        batch_id: batch_id.clone(),
        total,
        sent: tracker.sent_count(),
        failed: tracker.failed_count(),
        cancelled,
        history_flushed: unflushed.is_empty(),
    };
    info!(
        batch_id = %batch_id,
        sent = summary.sent,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "dispatch run finished"
    );
    tracker.finished(summary.clone());
    summary
}

/// Render (for text) and send one message, catching the gateway error at
/// contact granularity. Returns the outcome and the text stored in history.
async fn send_one(
    gateway: &dyn MessageGateway,
    job: &DispatchJob,
    contact: &Contact,
    config: &SendingConfig,
) -> (Result<(), String>, String) {
    match job.payload() {
        MessagePayload::Text { text } => {
            // One draw per variable per contact; every occurrence of a token
            // in this message gets the same drawn value.
            let rendered = template::render(text, job.variables());
            let result = gateway
                .send_text(&contact.number, &rendered, config, job.options())
                .await;
            (result.map(drop).map_err(|e| e.to_string()), rendered)
        }
        MessagePayload::Media(descriptor) => {
            let result = gateway
                .send_media(&contact.number, descriptor, config, job.options())
                .await;
            (
                result.map(drop).map_err(|e| e.to_string()),
                job.payload().history_message(None),
            )
        }
        MessagePayload::Voice { audio, encoding } => {
            let result = gateway
                .send_voice(&contact.number, audio, *encoding, config, job.options())
                .await;
            (
                result.map(drop).map_err(|e| e.to_string()),
                job.payload().history_message(None),
            )
        }
    }
}

/// Flush everything accumulated since the last successful flush. On failure
/// the records are retained and retried at the next flush boundary; the run
/// itself is never halted by a persistence error.
async fn flush_history(
    recorder: &dyn HistoryRecorder,
    batch_id: &BatchId,
    unflushed: &mut Vec<HistoryRecord>,
    tracker: &mut ProgressTracker,
) {
    if unflushed.is_empty() {
        return;
    }
    match recorder.record_batch(batch_id, unflushed).await {
        Ok(()) => {
            debug!(count = unflushed.len(), "history records flushed");
            unflushed.clear();
        }
        Err(e) => {
            warn!(error = %e, retained = unflushed.len(), "history flush failed, will retry");
            tracker.history_flush_failed(&e.to_string());
        }
    }
}

/// Sleep for `duration` unless cancelled first. Returns false on cancellation.
async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        () = tokio::time::sleep(duration) => true,
        () = cancel.cancelled() => false,
    }
}

fn snapshot_variables(variables: &[MessageVariable]) -> BTreeMap<String, Vec<String>> {
    variables
        .iter()
        .map(|v| (v.name.clone(), v.values.clone()))
        .collect()
}

fn make_record(
    batch_id: &BatchId,
    contact: &Contact,
    message: String,
    variables: BTreeMap<String, Vec<String>>,
    status: HistoryStatus,
    error_message: Option<String>,
) -> HistoryRecord {
    HistoryRecord {
        batch_id: batch_id.clone(),
        message,
        variables,
        contact: contact.into(),
        status,
        error_message,
        sent_at: chrono::Utc::now(),
    }
}
