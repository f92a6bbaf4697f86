// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch job construction and pre-run validation.
//!
//! A [`DispatchJob`] is an immutable snapshot of everything one run needs:
//! the resolved contact list, the payload, the variable set, the per-message
//! options, and the pacing configuration. Snapshotting at construction time
//! means edits to the operator's contact table mid-run cannot leak into a
//! dispatch in progress. Jobs are never persisted; they are consumed by the
//! scheduler and discarded at run completion.

use bandada_core::template;
use bandada_core::types::{
    BatchId, Contact, MediaKind, MessagePayload, MessageVariable, SendOptions, SendingConfig,
};
use bandada_core::BandadaError;

/// One run's worth of dispatch input, validated and frozen.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    batch_id: BatchId,
    contacts: Vec<Contact>,
    payload: MessagePayload,
    variables: Vec<MessageVariable>,
    options: SendOptions,
    config: SendingConfig,
}

impl DispatchJob {
    /// Build a job, running every pre-dispatch check.
    ///
    /// Placeholder rows (name and number both blank) are filtered out first
    /// and never counted. Any remaining failure blocks the run with a single
    /// user-facing [`BandadaError::Validation`]; no partial state is created.
    pub fn new(
        contacts: Vec<Contact>,
        payload: MessagePayload,
        variables: Vec<MessageVariable>,
        options: SendOptions,
        config: SendingConfig,
    ) -> Result<Self, BandadaError> {
        let contacts: Vec<Contact> = contacts
            .into_iter()
            .filter(|c| !c.is_placeholder())
            .collect();

        if contacts.is_empty() {
            return Err(BandadaError::Validation(
                "add at least one contact before dispatching".to_string(),
            ));
        }

        let invalid = contacts.iter().filter(|c| !c.is_valid).count();
        if invalid > 0 {
            return Err(BandadaError::Validation(format!(
                "{invalid} contact number(s) are invalid; correct them before dispatching"
            )));
        }

        match &payload {
            MessagePayload::Text { text } => {
                if text.trim().is_empty() {
                    return Err(BandadaError::Validation(
                        "the message must not be blank".to_string(),
                    ));
                }
                template::check_variables(text, &variables)?;
            }
            MessagePayload::Media(descriptor) => {
                if descriptor.media.trim().is_empty() {
                    return Err(BandadaError::Validation(
                        "select a file to send".to_string(),
                    ));
                }
                // Audio attachments do not require a caption; everything else does.
                if descriptor.kind != MediaKind::Audio
                    && descriptor
                        .caption
                        .as_deref()
                        .is_none_or(|c| c.trim().is_empty())
                {
                    return Err(BandadaError::Validation(
                        "add a caption for the file".to_string(),
                    ));
                }
            }
            MessagePayload::Voice { audio, .. } => {
                if audio.trim().is_empty() {
                    return Err(BandadaError::Validation(
                        "the voice note payload is empty".to_string(),
                    ));
                }
            }
        }

        config.validate()?;

        Ok(Self {
            batch_id: BatchId::new(),
            contacts,
            payload,
            variables,
            options,
            config,
        })
    }

    /// Identifier shared by every history record of this run.
    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn payload(&self) -> &MessagePayload {
        &self.payload
    }

    pub fn variables(&self) -> &[MessageVariable] {
        &self.variables
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    pub fn config(&self) -> &SendingConfig {
        &self.config
    }

    /// Number of delivery targets (placeholders already excluded).
    pub fn total(&self) -> usize {
        self.contacts.len()
    }

    /// `ceil(total / batch_size)`.
    pub fn total_batches(&self) -> usize {
        let batch = self.config.batch_size as usize;
        self.contacts.len().div_ceil(batch)
    }

    /// Static linear estimate of the seconds left for `contacts_remaining`
    /// targets: one batch delay between each remaining batch plus one message
    /// delay per remaining contact. Deliberately not adaptive to elapsed time.
    pub fn estimate_remaining_secs(&self, contacts_remaining: usize) -> u64 {
        let batch = self.config.batch_size as usize;
        let batches_remaining = contacts_remaining.div_ceil(batch) as u64;
        batches_remaining.saturating_sub(1) * self.config.batch_delay_secs
            + contacts_remaining as u64 * self.config.message_delay_secs
    }
}

#[cfg(test)]
mod tests {
    use bandada_core::types::ContactId;

    use super::*;

    fn contact(id: &str, name: &str, number: &str) -> Contact {
        Contact {
            id: ContactId(id.into()),
            name: name.into(),
            number: number.into(),
            is_valid: true,
        }
    }

    fn text_job(contacts: Vec<Contact>) -> Result<DispatchJob, BandadaError> {
        DispatchJob::new(
            contacts,
            MessagePayload::Text {
                text: "hola".into(),
            },
            vec![],
            SendOptions::default(),
            SendingConfig::default(),
        )
    }

    #[test]
    fn placeholder_rows_are_filtered_and_not_counted() {
        let job = text_job(vec![
            contact("a", "Ana", "+5491122334455"),
            contact("b", "", ""),
        ])
        .expect("valid job");
        assert_eq!(job.total(), 1);
    }

    #[test]
    fn empty_contact_list_is_rejected() {
        let err = text_job(vec![contact("a", "", "")]).unwrap_err();
        assert!(matches!(err, BandadaError::Validation(_)));
    }

    #[test]
    fn invalid_contacts_block_the_run() {
        let mut bad = contact("a", "Ana", "12345");
        bad.is_valid = false;
        let err = text_job(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("1 contact number(s)"));
    }

    #[test]
    fn blank_message_is_rejected() {
        let err = DispatchJob::new(
            vec![contact("a", "Ana", "+5491122334455")],
            MessagePayload::Text { text: "  ".into() },
            vec![],
            SendOptions::default(),
            SendingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BandadaError::Validation(_)));
    }

    #[test]
    fn used_variable_with_empty_pool_is_rejected() {
        let err = DispatchJob::new(
            vec![contact("a", "Ana", "+5491122334455")],
            MessagePayload::Text {
                text: "hola {city}".into(),
            },
            vec![MessageVariable {
                id: "city".into(),
                name: "{city}".into(),
                description: String::new(),
                values: vec![],
            }],
            SendOptions::default(),
            SendingConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("{city}"));
    }

    #[test]
    fn media_without_caption_is_rejected_except_audio() {
        let descriptor = |kind, caption: Option<&str>| {
            MessagePayload::Media(bandada_core::types::MediaDescriptor {
                kind,
                media: "https://example.com/file".into(),
                mime_type: None,
                caption: caption.map(str::to_string),
                file_name: None,
            })
        };
        let contacts = vec![contact("a", "Ana", "+5491122334455")];

        let err = DispatchJob::new(
            contacts.clone(),
            descriptor(MediaKind::Image, None),
            vec![],
            SendOptions::default(),
            SendingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BandadaError::Validation(_)));

        DispatchJob::new(
            contacts,
            descriptor(MediaKind::Audio, None),
            vec![],
            SendOptions::default(),
            SendingConfig::default(),
        )
        .expect("audio needs no caption");
    }

    #[test]
    fn out_of_range_pacing_is_rejected() {
        let err = DispatchJob::new(
            vec![contact("a", "Ana", "+5491122334455")],
            MessagePayload::Text {
                text: "hola".into(),
            },
            vec![],
            SendOptions::default(),
            SendingConfig {
                batch_size: 21,
                ..SendingConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, BandadaError::Validation(_)));
    }

    #[test]
    fn batch_arithmetic_matches_ceiling_division() {
        let contacts: Vec<Contact> = (0..12)
            .map(|i| contact(&format!("c{i}"), &format!("n{i}"), "+5491122334455"))
            .collect();
        let job = text_job(contacts).expect("valid job");
        assert_eq!(job.total(), 12);
        assert_eq!(job.total_batches(), 3);
        // 3 batches remaining: 2 batch delays + 12 message delays.
        assert_eq!(job.estimate_remaining_secs(12), 2 * 60 + 12 * 3);
        // Last partial batch: no batch delay left.
        assert_eq!(job.estimate_remaining_secs(2), 2 * 3);
    }
}
