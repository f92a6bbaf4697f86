// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evolution-API-compatible gateway adapter.
//!
//! Owns the HTTP/JSON framing toward the messaging gateway: endpoint paths,
//! the `apikey` header, payload shapes, and the mapping of gateway error
//! bodies onto [`BandadaError`]. The instance name is an explicit constructor
//! parameter; nothing here reads ambient process-wide state.

mod payload;

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use bandada_core::traits::gateway::MessageGateway;
use bandada_core::types::{DeliveryAck, MediaDescriptor, SendOptions, SendingConfig};
use bandada_core::validate::{normalize_number, validate_number};
use bandada_core::BandadaError;

use crate::payload::{MediaBody, TextBody, VoiceBody};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for one gateway instance.
pub struct EvolutionGateway {
    client: reqwest::Client,
    server_url: String,
    api_key: String,
    instance: String,
    timeout: Duration,
}

impl EvolutionGateway {
    /// Build a gateway client with the default 30 second request timeout.
    pub fn new(
        server_url: impl Into<String>,
        api_key: impl Into<String>,
        instance: impl Into<String>,
    ) -> Result<Self, BandadaError> {
        Self::with_timeout(server_url, api_key, instance, DEFAULT_TIMEOUT)
    }

    /// Build a gateway client with an explicit request timeout. A timed-out
    /// send surfaces as a per-contact failure, never as a run failure.
    pub fn with_timeout(
        server_url: impl Into<String>,
        api_key: impl Into<String>,
        instance: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BandadaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BandadaError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            server_url: server_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            instance: instance.into(),
            timeout,
        })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/message/{operation}/{}", self.server_url, self.instance)
    }

    /// Check and normalize a recipient number.
    ///
    /// Returns `Ok(None)` for blank numbers: those rows are "not yet
    /// specified" and are silently skipped, mirroring the contact table's
    /// incremental-editing semantics.
    fn recipient(&self, number: &str) -> Result<Option<String>, BandadaError> {
        if number.trim().is_empty() {
            return Ok(None);
        }
        if !validate_number(number) {
            return Err(BandadaError::Send {
                message: format!(
                    "invalid phone number {number}: must contain 10 to 15 digits including the country code"
                ),
                source: None,
            });
        }
        Ok(Some(normalize_number(number)))
    }

    async fn post<B: serde::Serialize>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<DeliveryAck, BandadaError> {
        let url = self.endpoint(operation);
        debug!(url = url.as_str(), "posting message to gateway");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BandadaError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    BandadaError::Send {
                        message: format!("gateway request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| BandadaError::Send {
            message: format!("failed to read gateway response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            if let Some(number) = unregistered_number(&text) {
                return Err(BandadaError::RecipientNotRegistered { number });
            }
            return Err(BandadaError::Send {
                message: format!("gateway returned {status}: {text}"),
                source: None,
            });
        }

        let message_id = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.pointer("/key/id").and_then(|id| id.as_str().map(String::from)));
        Ok(DeliveryAck { message_id })
    }
}

/// The gateway reports an unreachable recipient as
/// `response.message[0].exists == false` inside an error body.
fn unregistered_number(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let entry = value.pointer("/response/message/0")?;
    if entry.get("exists")?.as_bool()? {
        return None;
    }
    Some(
        entry
            .get("number")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string(),
    )
}

#[async_trait]
impl MessageGateway for EvolutionGateway {
    fn name(&self) -> &str {
        "evolution-api"
    }

    async fn send_text(
        &self,
        number: &str,
        text: &str,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let Some(recipient) = self.recipient(number)? else {
            return Ok(DeliveryAck::default());
        };
        let body = TextBody::new(recipient, text, pacing, options);
        self.post("sendText", &body).await
    }

    async fn send_media(
        &self,
        number: &str,
        media: &MediaDescriptor,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let Some(recipient) = self.recipient(number)? else {
            return Ok(DeliveryAck::default());
        };
        let body = MediaBody::new(recipient, media, pacing, options);
        self.post("sendMedia", &body).await
    }

    async fn send_voice(
        &self,
        number: &str,
        audio: &str,
        encoding: bool,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError> {
        let Some(recipient) = self.recipient(number)? else {
            return Ok(DeliveryAck::default());
        };
        let body = VoiceBody::new(recipient, audio, encoding, pacing, options);
        self.post("sendWhatsAppAudio", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_number_is_extracted_from_error_body() {
        let body = r#"{"response":{"message":[{"exists":false,"number":"5491122334455"}]}}"#;
        assert_eq!(
            unregistered_number(body),
            Some("5491122334455".to_string())
        );
    }

    #[test]
    fn existing_number_is_not_flagged() {
        let body = r#"{"response":{"message":[{"exists":true,"number":"5491122334455"}]}}"#;
        assert_eq!(unregistered_number(body), None);
    }

    #[test]
    fn non_json_body_is_not_flagged() {
        assert_eq!(unregistered_number("internal server error"), None);
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let gateway =
            EvolutionGateway::new("https://api.example.com/", "secret", "instawha_ana").unwrap();
        assert_eq!(
            gateway.endpoint("sendText"),
            "https://api.example.com/message/sendText/instawha_ana"
        );
    }
}
