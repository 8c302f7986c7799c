// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sol outbox pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup with actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sol configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolConfig {
    /// Process-wide application settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Chat server endpoint settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbox engine settings.
    #[serde(default)]
    pub outbox: OutboxConfig,
}

/// Process-wide application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat server endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the chat server, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. The literal `:memory:` selects a
    /// non-durable in-memory database for testing.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl StorageConfig {
    /// True when the configured path selects the in-memory test mode.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sol").join("sol.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sol.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Outbox engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutboxConfig {
    /// Messages whose trimmed text starts with this prefix (case-insensitive)
    /// are enqueued as debug-fail packets.
    #[serde(default = "default_debug_fail_prefix")]
    pub debug_fail_prefix: String,

    /// Interval between queue-processing cycles in the drain loop, seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            debug_fail_prefix: default_debug_fail_prefix(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_debug_fail_prefix() -> String {
    "#fail".to_string()
}

fn default_poll_interval_secs() -> u64 {
    2
}
