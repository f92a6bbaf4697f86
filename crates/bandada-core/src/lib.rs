// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bandada batch messaging dispatcher.
//!
//! This crate provides the domain types, the error enum, the collaborator
//! traits (gateway and history recorder), and the pure pre-dispatch
//! components: phone number validation, duplicate detection, and the
//! variable substitution engine. The dispatch state machine itself lives in
//! `bandada-engine`.

pub mod dedup;
pub mod error;
pub mod template;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use error::BandadaError;
pub use traits::{HistoryRecorder, MessageGateway};
pub use types::{
    BatchId, Contact, ContactId, ContactSnapshot, DeliveryAck, HistoryRecord, HistoryStatus,
    MediaDescriptor, MediaKind, MessagePayload, MessageVariable, SendOptions, SendingConfig,
};
