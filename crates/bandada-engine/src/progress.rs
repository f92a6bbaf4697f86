// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable progress and log stream for a dispatch run.
//!
//! The scheduler owns a [`ProgressTracker`]; observers hold a
//! [`DispatchHandle`]. Aggregate counters travel on a `watch` channel (late
//! subscribers see the latest snapshot), per-contact log entries and run
//! milestones travel on an unbounded `mpsc` channel. The stream has no
//! behavior of its own; it exists so scheduler state is observable without
//! coupling the loop to any rendering concern.

use bandada_core::types::{Contact, ContactId};
use tokio::sync::{mpsc, watch};

use crate::scheduler::RunSummary;

/// Aggregate counters for one dispatch run.
///
/// `current` is monotonically non-decreasing and counts both successes and
/// failures; the run is terminal once `current == total`.
#[derive(Debug, Clone, Default)]
pub struct SendingProgress {
    pub current: usize,
    pub total: usize,
    pub successful: Vec<Contact>,
    /// Failed contacts paired with the captured error text.
    pub failed: Vec<(Contact, String)>,
    pub current_batch: usize,
    pub total_batches: usize,
    /// Static linear estimate, recomputed at each batch start.
    pub remaining_secs: u64,
}

impl SendingProgress {
    pub fn is_terminal(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }
}

/// Status of one contact's log entry. Transitions pending to success or
/// failure exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Pending,
    Success,
    Failure,
}

/// One line of the live activity feed. Keyed by contact id; consumers update
/// entries in place, entries are never removed.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: ContactId,
    pub contact_name: String,
    pub status: LogStatus,
    pub message: String,
}

/// Milestones emitted by the scheduler as the run proceeds.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// A new batch is starting (1-based index).
    BatchStarted {
        batch: usize,
        total_batches: usize,
        remaining_secs: u64,
    },
    /// A log entry was appended or updated.
    Log(LogEntry),
    /// A history flush failed; the records are retained for the next flush.
    HistoryFlushFailed { error: String },
    /// The run reached its terminal state.
    Finished(RunSummary),
}

/// Observer end of a dispatch run.
pub struct DispatchHandle {
    /// Latest aggregate snapshot.
    pub progress: watch::Receiver<SendingProgress>,
    /// Ordered event feed.
    pub events: mpsc::UnboundedReceiver<DispatchEvent>,
}

/// Scheduler-side state holder. Mutated synchronously from the single
/// control task, so no locking is needed.
pub(crate) struct ProgressTracker {
    progress: SendingProgress,
    progress_tx: watch::Sender<SendingProgress>,
    events_tx: mpsc::UnboundedSender<DispatchEvent>,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize, total_batches: usize, remaining_secs: u64) -> (Self, DispatchHandle) {
        let progress = SendingProgress {
            total,
            total_batches,
            remaining_secs,
            ..SendingProgress::default()
        };
        let (progress_tx, progress_rx) = watch::channel(progress.clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                progress,
                progress_tx,
                events_tx,
            },
            DispatchHandle {
                progress: progress_rx,
                events: events_rx,
            },
        )
    }

    pub(crate) fn batch_started(&mut self, batch: usize, remaining_secs: u64) {
        self.progress.current_batch = batch;
        self.progress.remaining_secs = remaining_secs;
        self.publish();
        self.emit(DispatchEvent::BatchStarted {
            batch,
            total_batches: self.progress.total_batches,
            remaining_secs,
        });
    }

    pub(crate) fn contact_pending(&mut self, contact: &Contact) {
        self.emit(DispatchEvent::Log(LogEntry {
            id: contact.id.clone(),
            contact_name: contact.name.clone(),
            status: LogStatus::Pending,
            message: format!("sending message to {}...", contact.name),
        }));
    }

    pub(crate) fn contact_sent(&mut self, contact: &Contact) {
        self.progress.current += 1;
        self.progress.successful.push(contact.clone());
        self.publish();
        self.emit(DispatchEvent::Log(LogEntry {
            id: contact.id.clone(),
            contact_name: contact.name.clone(),
            status: LogStatus::Success,
            message: format!("message sent to {}", contact.name),
        }));
    }

    pub(crate) fn contact_failed(&mut self, contact: &Contact, error: &str) {
        self.progress.current += 1;
        self.progress
            .failed
            .push((contact.clone(), error.to_string()));
        self.publish();
        self.emit(DispatchEvent::Log(LogEntry {
            id: contact.id.clone(),
            contact_name: contact.name.clone(),
            status: LogStatus::Failure,
            message: format!("failed to send to {}: {error}", contact.name),
        }));
    }

    pub(crate) fn history_flush_failed(&mut self, error: &str) {
        self.emit(DispatchEvent::HistoryFlushFailed {
            error: error.to_string(),
        });
    }

    pub(crate) fn finished(&mut self, summary: RunSummary) {
        self.publish();
        self.emit(DispatchEvent::Finished(summary));
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.progress.successful.len()
    }

    pub(crate) fn failed_count(&self) -> usize {
        self.progress.failed.len()
    }

    fn publish(&self) {
        // send_replace never fails; watch keeps the value even with no receivers.
        self.progress_tx.send_replace(self.progress.clone());
    }

    fn emit(&self, event: DispatchEvent) {
        // A dropped observer must not stop the run.
        let _ = self.events_tx.send(event);
    }
}
