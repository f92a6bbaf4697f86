// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch dispatch engine for Bandada.
//!
//! The engine takes a validated [`DispatchJob`] and drives a sequential,
//! rate-limited, failure-isolated send loop over a
//! [`MessageGateway`](bandada_core::MessageGateway), producing live progress
//! through a [`DispatchHandle`] and delivery records through a
//! [`HistoryRecorder`](bandada_core::HistoryRecorder).

pub mod job;
pub mod progress;
pub mod scheduler;

pub use job::DispatchJob;
pub use progress::{DispatchEvent, DispatchHandle, LogEntry, LogStatus, SendingProgress};
pub use scheduler::{Dispatcher, RunSummary};
