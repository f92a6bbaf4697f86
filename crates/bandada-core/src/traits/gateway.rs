// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway trait for the external messaging service.

use async_trait::async_trait;

use crate::error::BandadaError;
use crate::types::{DeliveryAck, MediaDescriptor, SendOptions, SendingConfig};

/// The send capability the engine invokes once per contact.
///
/// Implementations own the wire format (HTTP framing, auth headers) and must
/// enforce a bounded request timeout; a timeout surfaces as an `Err`, which
/// the engine treats as a per-contact send failure, never as a run failure.
/// The pacing config is passed as a hint because some gateways apply their
/// own server-side typing delay derived from it.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Human-readable adapter name for logs.
    fn name(&self) -> &str;

    /// Send a text message to one recipient.
    async fn send_text(
        &self,
        number: &str,
        text: &str,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError>;

    /// Send a media attachment (image, video, document, audio file).
    async fn send_media(
        &self,
        number: &str,
        media: &MediaDescriptor,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError>;

    /// Send a voice note. `encoding` asks the gateway to transcode the audio
    /// into its native voice format.
    async fn send_voice(
        &self,
        number: &str,
        audio: &str,
        encoding: bool,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Result<DeliveryAck, BandadaError>;
}
