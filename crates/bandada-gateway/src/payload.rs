// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request body shapes for the gateway's message endpoints.
//!
//! Field names follow the gateway's wire format exactly, including its mixed
//! casing (`mediatype`, `mimetype`, `fileName`). The `delay` field is the
//! per-message pacing hint in milliseconds.

use serde::Serialize;

use bandada_core::types::{MediaDescriptor, SendOptions, SendingConfig};

fn delay_ms(pacing: &SendingConfig) -> u64 {
    pacing.message_delay_secs * 1000
}

#[derive(Debug, Serialize)]
pub(crate) struct TextBody {
    number: String,
    text: String,
    delay: u64,
    #[serde(rename = "linkPreview")]
    link_preview: bool,
    #[serde(rename = "mentionsEveryOne")]
    mentions_everyone: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mentioned: Vec<String>,
}

impl TextBody {
    pub(crate) fn new(
        number: String,
        text: &str,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Self {
        Self {
            number,
            text: text.to_string(),
            delay: delay_ms(pacing),
            link_preview: options.link_preview,
            mentions_everyone: options.mentions_everyone,
            mentioned: options.mentioned.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MediaBody {
    number: String,
    mediatype: String,
    media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(rename = "fileName", skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    delay: u64,
    #[serde(rename = "mentionsEveryOne")]
    mentions_everyone: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mentioned: Vec<String>,
}

impl MediaBody {
    pub(crate) fn new(
        number: String,
        media: &MediaDescriptor,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Self {
        Self {
            number,
            mediatype: media.kind.to_string(),
            media: media.media.clone(),
            mimetype: media.mime_type.clone(),
            caption: media.caption.clone(),
            file_name: media.file_name.clone(),
            delay: delay_ms(pacing),
            mentions_everyone: options.mentions_everyone,
            mentioned: options.mentioned.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct VoiceBody {
    number: String,
    audio: String,
    encoding: bool,
    delay: u64,
    #[serde(rename = "mentionsEveryOne")]
    mentions_everyone: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mentioned: Vec<String>,
}

impl VoiceBody {
    pub(crate) fn new(
        number: String,
        audio: &str,
        encoding: bool,
        pacing: &SendingConfig,
        options: &SendOptions,
    ) -> Self {
        Self {
            number,
            audio: audio.to_string(),
            encoding,
            delay: delay_ms(pacing),
            mentions_everyone: options.mentions_everyone,
            mentioned: options.mentioned.clone(),
        }
    }
}
