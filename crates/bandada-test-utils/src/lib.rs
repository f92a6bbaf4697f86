// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Bandada collaborator traits.
//!
//! `MockGateway` and `MockRecorder` implement the gateway and history
//! recorder traits with captured calls and scripted failures, enabling
//! fast, CI-runnable dispatch tests without a messaging account.

pub mod mock_gateway;
pub mod mock_recorder;

pub use mock_gateway::{MockGateway, SentKind, SentMessage};
pub use mock_recorder::MockRecorder;
