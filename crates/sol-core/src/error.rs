// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sol outbox pipeline.

use thiserror::Error;

/// The primary error type used across all Sol trait seams and core operations.
#[derive(Debug, Error)]
pub enum SolError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport-level errors (connection failure, timeout, body read failure).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a non-success HTTP status. The body is kept
    /// verbatim as diagnostic text.
    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The server honored the `x-sol-simulate-status` debug header. Kept
    /// distinct from [`SolError::Http`] so tests can assert the failure path
    /// was exercised deliberately.
    #[error("simulated failure (status {status})")]
    SimulatedFailure { status: u16 },

    /// The server answered 2xx but the body could not be decoded.
    #[error("bad response from server: {0}")]
    BadResponse(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolError {
    /// True for the debug-only simulated failure kind.
    pub fn is_simulated(&self) -> bool {
        matches!(self, SolError::SimulatedFailure { .. })
    }
}
