// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bandada_config::{load_and_validate_str, load_config_from_str, ConfigError};

#[test]
fn defaults_when_empty() {
    let config = load_config_from_str("").expect("empty config should parse");
    assert_eq!(config.agent.name, "bandada");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.sending.batch_size, 5);
    assert_eq!(config.sending.batch_delay_secs, 60);
    assert_eq!(config.sending.message_delay_secs, 3);
    assert_eq!(config.gateway.request_timeout_secs, 30);
    assert!(config.gateway.server_url.is_none());
}

#[test]
fn full_config_parses() {
    let toml = r#"
        [agent]
        name = "flock"
        log_level = "debug"

        [gateway]
        server_url = "https://evo.example.com"
        api_key = "secret"
        instance = "campaigns"
        request_timeout_secs = 10

        [sending]
        batch_size = 10
        batch_delay_secs = 120
        message_delay_secs = 5

        [storage]
        database_path = "/tmp/bandada-test.db"
    "#;
    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.agent.name, "flock");
    assert_eq!(
        config.gateway.server_url.as_deref(),
        Some("https://evo.example.com")
    );
    assert_eq!(config.gateway.instance.as_deref(), Some("campaigns"));
    assert_eq!(config.sending.batch_size, 10);
    assert_eq!(config.storage.database_path, "/tmp/bandada-test.db");
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
        [gateway]
        insance = "campaigns"
    "#;
    let errors = load_and_validate_str(toml).unwrap_err();
    // Figment wraps serde's deny_unknown_fields error; when it surfaces as a
    // structured unknown-field kind the fuzzy suggestion must point at the
    // intended key.
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => key == "insance" && suggestion.as_deref() == Some("instance"),
        other => other.to_string().contains("insance"),
    });
    assert!(found, "expected unknown-key diagnostic, got {errors:?}");
}

#[test]
fn out_of_range_pacing_collects_all_violations() {
    let toml = r#"
        [sending]
        batch_size = 0
        batch_delay_secs = 10
        message_delay_secs = 99
    "#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3);
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(messages.iter().any(|m| m.contains("batch_size")));
    assert!(messages.iter().any(|m| m.contains("batch_delay_secs")));
    assert!(messages.iter().any(|m| m.contains("message_delay_secs")));
}

#[test]
fn bad_server_url_scheme_rejected() {
    let toml = r#"
        [gateway]
        server_url = "ftp://evo.example.com"
    "#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("http:// or https://")));
}

#[test]
fn wrong_type_reported() {
    let toml = r#"
        [sending]
        batch_size = "lots"
    "#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
}
