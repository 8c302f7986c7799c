// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde attributes cannot express, such as
//! well-formed URLs and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::SolConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SolConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.server.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("server.base_url `{base_url}` must start with http:// or https://"),
        });
    } else if base_url.ends_with('/') {
        errors.push(ConfigError::Validation {
            message: "server.base_url must not end with a trailing slash".to_string(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "server.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.outbox.debug_fail_prefix.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "outbox.debug_fail_prefix must not be empty".to_string(),
        });
    }

    if config.outbox.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "outbox.poll_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SolConfig::default()).is_ok());
    }

    #[test]
    fn empty_base_url_fails() {
        let mut config = SolConfig::default();
        config.server.base_url = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))
        ));
    }

    #[test]
    fn non_http_scheme_fails() {
        let mut config = SolConfig::default();
        config.server.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn trailing_slash_fails() {
        let mut config = SolConfig::default();
        config.server.base_url = "http://example.com/".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_poll_interval_fails() {
        let mut config = SolConfig::default();
        config.outbox.poll_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("poll_interval"))
        ));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = SolConfig::default();
        config.server.base_url = String::new();
        config.storage.database_path = String::new();
        config.outbox.debug_fail_prefix = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
