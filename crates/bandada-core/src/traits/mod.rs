// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the dispatch engine depends on.

pub mod gateway;
pub mod history;

pub use gateway::MessageGateway;
pub use history::HistoryRecorder;
