// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sol.toml` > `~/.config/sol/sol.toml` >
//! `/etc/sol/sol.toml` with environment variable overrides via `SOL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SolConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sol/sol.toml` (system-wide)
/// 3. `~/.config/sol/sol.toml` (user XDG config)
/// 4. `./sol.toml` (local directory)
/// 5. `SOL_*` environment variables
pub fn load_config() -> Result<SolConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and for callers that already hold the TOML content.
pub fn load_config_from_str(toml_content: &str) -> Result<SolConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SolConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use so callers can inspect metadata before extraction).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SolConfig::default()))
        .merge(Toml::file("/etc/sol/sol.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sol/sol.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sol.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SOL_SERVER_BASE_URL` must map to
/// `server.base_url`, not `server.base.url`.
fn env_provider() -> Env {
    Env::prefixed("SOL_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("outbox_", "outbox.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[server]
base_url = "https://chat.example.net"

[storage]
database_path = ":memory:"
"#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "https://chat.example.net");
        assert!(config.storage.is_in_memory());
        // Untouched sections keep their defaults.
        assert_eq!(config.outbox.debug_fail_prefix, "#fail");
    }

    #[test]
    #[serial_test::serial]
    fn env_override_maps_section_keys() {
        // SAFETY: serialised test, no concurrent env access.
        unsafe { std::env::set_var("SOL_SERVER_BASE_URL", "http://envhost:9999") };
        let config = load_config().unwrap();
        unsafe { std::env::remove_var("SOL_SERVER_BASE_URL") };
        assert_eq!(config.server.base_url, "http://envhost:9999");
    }

    #[test]
    #[serial_test::serial]
    fn env_override_handles_underscore_keys() {
        unsafe { std::env::set_var("SOL_OUTBOX_POLL_INTERVAL_SECS", "7") };
        let config = load_config().unwrap();
        unsafe { std::env::remove_var("SOL_OUTBOX_POLL_INTERVAL_SECS") };
        assert_eq!(config.outbox.poll_interval_secs, 7);
    }
}
