// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: pacing ranges, a usable gateway URL, a non-empty database
//! path. Collects every violation instead of failing fast.

use bandada_core::types::SendingConfig;

use crate::diagnostic::ConfigError;
use crate::model::BandadaConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &BandadaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let sending = &config.sending;
    if !SendingConfig::BATCH_SIZE_RANGE.contains(&sending.batch_size) {
        errors.push(ConfigError::Validation {
            message: format!(
                "sending.batch_size must be between 1 and 20, got {}",
                sending.batch_size
            ),
        });
    }
    if !SendingConfig::BATCH_DELAY_RANGE.contains(&sending.batch_delay_secs) {
        errors.push(ConfigError::Validation {
            message: format!(
                "sending.batch_delay_secs must be between 30 and 300, got {}",
                sending.batch_delay_secs
            ),
        });
    }
    if !SendingConfig::MESSAGE_DELAY_RANGE.contains(&sending.message_delay_secs) {
        errors.push(ConfigError::Validation {
            message: format!(
                "sending.message_delay_secs must be between 1 and 30, got {}",
                sending.message_delay_secs
            ),
        });
    }

    if let Some(url) = config.gateway.server_url.as_deref() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("gateway.server_url `{url}` must start with http:// or https://"),
            });
        }
    }

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
