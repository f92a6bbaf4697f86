// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bandada dispatch engine.

use thiserror::Error;

/// The primary error type used across all Bandada collaborator traits and
/// core operations.
#[derive(Debug, Error)]
pub enum BandadaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Pre-dispatch validation errors (bad pacing values, no valid contacts,
    /// blank template, unfilled variables). These block a run before any
    /// message is sent; no partial state is created.
    #[error("validation error: {0}")]
    Validation(String),

    /// A gateway send operation failed for one recipient.
    #[error("send error: {message}")]
    Send {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The recipient number is not registered on the messaging network.
    ///
    /// Distinct from [`BandadaError::Send`] so the operator sees the dedicated
    /// wording instead of a raw gateway response body.
    #[error("the number {number} is not registered on the messaging network")]
    RecipientNotRegistered { number: String },

    /// History persistence errors (database connection, query failure).
    #[error("history persistence error: {source}")]
    Persist {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
