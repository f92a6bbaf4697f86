// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the dispatch engine and collaborator traits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::BandadaError;

/// Opaque identifier for a contact row. Identity for log entries and history
/// records; dedup equality is by normalized number, never by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

/// Identifier shared by every history record of one dispatch run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub String);

impl BatchId {
    /// Generate a fresh run identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One delivery target. Produced by the external contact-acquisition
/// collaborator; the engine consumes contacts read-only and never mutates
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
    pub is_valid: bool,
}

impl Contact {
    /// True when both name and number are blank. Placeholder rows come from
    /// incremental table editing and are never delivery targets.
    pub fn is_placeholder(&self) -> bool {
        self.name.trim().is_empty() && self.number.trim().is_empty()
    }
}

/// A named template token with a pool of candidate values.
///
/// The `name` is the literal token embedded in template text, e.g. `{city}`.
/// One value is drawn uniformly at random per render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageVariable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub values: Vec<String>,
}

/// Pacing configuration for one dispatch run. Immutable once the run starts.
///
/// The ranges exist to keep send rate inside what the gateway provider
/// tolerates; out-of-range values block the run with a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendingConfig {
    /// Messages per batch, 1..=20.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Pause between batches in seconds, 30..=300.
    #[serde(default = "default_batch_delay")]
    pub batch_delay_secs: u64,
    /// Pause between messages in seconds, 1..=30.
    #[serde(default = "default_message_delay")]
    pub message_delay_secs: u64,
}

fn default_batch_size() -> u32 {
    5
}

fn default_batch_delay() -> u64 {
    60
}

fn default_message_delay() -> u64 {
    3
}

impl Default for SendingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_secs: default_batch_delay(),
            message_delay_secs: default_message_delay(),
        }
    }
}

impl SendingConfig {
    pub const BATCH_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=20;
    pub const BATCH_DELAY_RANGE: std::ops::RangeInclusive<u64> = 30..=300;
    pub const MESSAGE_DELAY_RANGE: std::ops::RangeInclusive<u64> = 1..=30;

    /// Validate all pacing ranges, collecting every violation into a single
    /// user-facing message.
    pub fn validate(&self) -> Result<(), BandadaError> {
        let mut problems = Vec::new();
        if !Self::BATCH_SIZE_RANGE.contains(&self.batch_size) {
            problems.push(format!(
                "batch size must be between 1 and 20 messages, got {}",
                self.batch_size
            ));
        }
        if !Self::BATCH_DELAY_RANGE.contains(&self.batch_delay_secs) {
            problems.push(format!(
                "batch delay must be between 30 and 300 seconds, got {}",
                self.batch_delay_secs
            ));
        }
        if !Self::MESSAGE_DELAY_RANGE.contains(&self.message_delay_secs) {
            problems.push(format!(
                "message delay must be between 1 and 30 seconds, got {}",
                self.message_delay_secs
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(BandadaError::Validation(problems.join("; ")))
        }
    }
}

/// Per-message gateway options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Render link previews for URLs in the message body.
    #[serde(default)]
    pub link_preview: bool,
    /// Mention every member when the target is a group.
    #[serde(default)]
    pub mentions_everyone: bool,
    /// Explicit mention list (resolved channel addresses).
    #[serde(default)]
    pub mentioned: Vec<String>,
}

/// Media categories the gateway distinguishes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
    Audio,
}

/// A media attachment. The engine passes it through unchanged; captions are
/// never run through variable substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    /// URL or base64 payload, whichever the operator supplied.
    pub media: String,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
}

/// What one dispatch run delivers to every contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    /// A text template, personalized per contact via variable substitution.
    Text { text: String },
    /// A media attachment with an optional caption.
    Media(MediaDescriptor),
    /// A voice note (gateway-encoded audio).
    Voice { audio: String, encoding: bool },
}

impl MessagePayload {
    /// The text stored in a history record for this payload. For text
    /// payloads the caller passes the rendered message; media falls back to
    /// caption or a `[kind] name` marker.
    pub fn history_message(&self, rendered_text: Option<&str>) -> String {
        match self {
            Self::Text { text } => rendered_text.unwrap_or(text).to_string(),
            Self::Media(descriptor) => descriptor.caption.clone().unwrap_or_else(|| {
                format!(
                    "[{}] {}",
                    descriptor.kind,
                    descriptor.file_name.as_deref().unwrap_or("attachment")
                )
            }),
            Self::Voice { .. } => "[audio]".to_string(),
        }
    }
}

/// Acknowledgement returned by the gateway for one accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryAck {
    /// Gateway-assigned message id, when the gateway reports one.
    pub message_id: Option<String>,
}

/// Outcome recorded for one contact of one dispatch run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Success,
    Error,
    Pending,
}

/// The contact fields snapshotted into a history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

impl From<&Contact> for ContactSnapshot {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            number: contact.number.clone(),
        }
    }
}

/// A persisted, per-contact outcome of a dispatch run. Created by the
/// engine, owned thereafter by the history recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub batch_id: BatchId,
    /// The rendered message text (or media marker) that was sent.
    pub message: String,
    /// Snapshot of the variable pools active for the run, name to values.
    pub variables: BTreeMap<String, Vec<String>>,
    pub contact: ContactSnapshot,
    pub status: HistoryStatus,
    pub error_message: Option<String>,
    pub sent_at: DateTime<Utc>,
}
