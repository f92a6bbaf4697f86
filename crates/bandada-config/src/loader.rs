// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./bandada.toml` > `~/.config/bandada/bandada.toml`
//! > `/etc/bandada/bandada.toml`, with environment variable overrides via the
//! `BANDADA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BandadaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bandada/bandada.toml` (system-wide)
/// 3. `~/.config/bandada/bandada.toml` (user XDG config)
/// 4. `./bandada.toml` (local directory)
/// 5. `BANDADA_*` environment variables
pub fn load_config() -> Result<BandadaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BandadaConfig::default()))
        .merge(Toml::file("/etc/bandada/bandada.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bandada/bandada.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bandada.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BandadaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BandadaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BandadaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BandadaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BANDADA_GATEWAY_SERVER_URL` must map to
/// `gateway.server_url`, not `gateway.server.url`.
fn env_provider() -> Env {
    Env::prefixed("BANDADA_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("sending_", "sending.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
