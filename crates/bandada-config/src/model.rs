// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use bandada_core::types::SendingConfig;
use serde::{Deserialize, Serialize};

/// Top-level Bandada configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the gateway section must be filled in before `bandada send` can
/// actually talk to a server.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BandadaConfig {
    /// Identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Messaging gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Default pacing for dispatch runs. Same bounds as the engine enforces.
    #[serde(default)]
    pub sending: SendingConfig,

    /// History storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "bandada".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Messaging gateway connection configuration.
///
/// The instance name is per-operator and must be explicit; nothing derives
/// it from ambient process state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the gateway server, e.g. `https://api.example.com`.
    #[serde(default)]
    pub server_url: Option<String>,

    /// API key sent in the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Gateway instance name the messages are sent through.
    #[serde(default)]
    pub instance: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            instance: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// History storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the SQLite history database.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("bandada/history.db").display().to_string())
        .unwrap_or_else(|| "bandada-history.db".to_string())
}
