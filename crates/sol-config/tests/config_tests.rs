// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sol configuration system.

use sol_config::diagnostic::{suggest_key, ConfigError};
use sol_config::model::SolConfig;
use sol_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sol_config() {
    let toml = r#"
[app]
log_level = "debug"

[server]
base_url = "https://chat.example.net"
request_timeout_secs = 15

[storage]
database_path = "/tmp/sol-test.db"
wal_mode = false

[outbox]
debug_fail_prefix = "!boom"
poll_interval_secs = 5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.server.base_url, "https://chat.example.net");
    assert_eq!(config.server.request_timeout_secs, 15);
    assert_eq!(config.storage.database_path, "/tmp/sol-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.outbox.debug_fail_prefix, "!boom");
    assert_eq!(config.outbox.poll_interval_secs, 5);
}

/// Unknown field in [server] produces an UnknownField error.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
base_ur = "http://localhost:1"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_ur"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.server.base_url, "http://127.0.0.1:8787");
    assert_eq!(config.server.request_timeout_secs, 30);
    assert!(config.storage.wal_mode);
    assert_eq!(config.outbox.debug_fail_prefix, "#fail");
    assert_eq!(config.outbox.poll_interval_secs, 2);
}

/// A later provider overrides an earlier one for the same key.
#[test]
fn later_provider_overrides_toml_value() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[server]
base_url = "http://from-toml:1"
"#;

    let config: SolConfig = Figment::new()
        .merge(Serialized::defaults(SolConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("server.base_url", "http://override:2"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.server.base_url, "http://override:2");
}

/// load_and_validate_str rejects a structurally valid but semantically bad config.
#[test]
fn validation_rejects_trailing_slash_base_url() {
    let toml = r#"
[server]
base_url = "http://localhost:8787/"
"#;

    let errors = load_and_validate_str(toml).expect_err("trailing slash should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("trailing slash")
    )));
}

/// load_and_validate_str accepts a fully valid config.
#[test]
fn validation_accepts_valid_config() {
    let toml = r#"
[server]
base_url = "https://chat.example.net"

[storage]
database_path = ":memory:"
"#;

    let config = load_and_validate_str(toml).expect("valid config should pass");
    assert!(config.storage.is_in_memory());
}

/// Typo suggestions surface through the diagnostic layer.
#[test]
fn suggestion_for_close_typo() {
    assert_eq!(
        suggest_key("pol_interval_secs", &["debug_fail_prefix", "poll_interval_secs"]),
        Some("poll_interval_secs".to_string())
    );
}

/// Wrong value type produces an InvalidType-style error.
#[test]
fn wrong_type_produces_error() {
    let toml = r#"
[outbox]
poll_interval_secs = "often"
"#;

    let errors = load_and_validate_str(toml).expect_err("string for u64 should fail");
    assert!(!errors.is_empty());
}
