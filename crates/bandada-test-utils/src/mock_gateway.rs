// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message gateway for deterministic testing.
//!
//! Captures every send for assertion and supports scripting failures per
//! recipient number, including the "not registered on the network" case.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bandada_core::traits::gateway::MessageGateway;
use bandada_core::types::{DeliveryAck, MediaDescriptor, SendOptions, SendingConfig};
use bandada_core::validate::normalize_number;
use bandada_core::BandadaError;

/// Which gateway operation a captured send went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentKind {
    Text,
    Media,
    Voice,
}

/// One captured send.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// The number as the engine passed it (not normalized).
    pub number: String,
    pub kind: SentKind,
    /// Rendered text for text sends, caption for media, `None` for voice.
    pub text: Option<String>,
}

/// A mock gateway that records sends and fails on demand.
#[derive(Default)]
pub struct MockGateway {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    /// Normalized number to scripted error message.
    failures: Arc<Mutex<HashMap<String, String>>>,
    /// Normalized numbers reported as not registered on the network.
    rejected: Arc<Mutex<HashSet<String>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a plain send failure for `number`.
    pub async fn fail_number(&self, number: &str, message: &str) {
        self.failures
            .lock()
            .await
            .insert(normalize_number(number), message.to_string());
    }

    /// Script the recognized "not registered" failure for `number`.
    pub async fn reject_number(&self, number: &str) {
        self.rejected.lock().await.insert(normalize_number(number));
    }

    /// All sends captured so far, in order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    async fn dispatch_outcome(&self, number: &str) -> Result<DeliveryAck, BandadaError> {
        let key = normalize_number(number);
        if self.rejected.lock().await.contains(&key) {
            return Err(BandadaError::RecipientNotRegistered {
                number: key,
            });
        }
        if let Some(message) = self.failures.lock().await.get(&key) {
            return Err(BandadaError::Send {
                message: message.clone(),
                source: None,
            });
        }
        Ok(DeliveryAck {
            message_id: Some(format!("mock-{}", uuid::Uuid::new_v4())),
        })
    }

    async fn capture(&self, number: &str, kind: SentKind, text: Option<String>) {
        self.sent.lock().await.push(SentMessage {
            number: number.to_string(),
            kind,
            text,
        });
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn send_text(
        &self,
        number: &str,
        text: &str,
        _pacing: &SendingConfig,
        _options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let outcome = self.dispatch_outcome(number).await;
        if outcome.is_ok() {
            self.capture(number, SentKind::Text, Some(text.to_string()))
                .await;
        }
        outcome
    }

    async fn send_media(
        &self,
        number: &str,
        media: &MediaDescriptor,
        _pacing: &SendingConfig,
        _options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let outcome = self.dispatch_outcome(number).await;
        if outcome.is_ok() {
            self.capture(number, SentKind::Media, media.caption.clone())
                .await;
        }
        outcome
    }

    async fn send_voice(
        &self,
        number: &str,
        _audio: &str,
        _encoding: bool,
        _pacing: &SendingConfig,
        _options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let outcome = self.dispatch_outcome(number).await;
        if outcome.is_ok() {
            self.capture(number, SentKind::Voice, None).await;
        }
        outcome
    }
}
