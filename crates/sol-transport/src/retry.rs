// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure classification of an HTTP outcome into a retry decision.
//!
//! `classify` never performs I/O and never mutates anything; the transport
//! records its output in diagnostics and callers decide what to do with it.

use reqwest::header::HeaderMap;

/// How the decision was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// Derived from the HTTP status (the default).
    HttpStatus,
    /// A 400 body could not be parsed for an error code; the default
    /// non-retryable classification applies.
    ParseFailedDefault,
}

/// Transport-level failure kinds, derived from the HTTP client error when no
/// status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The request timed out. Retryable.
    Timeout,
    /// Connection could not be established. Retryable.
    Connect,
    /// The request was malformed or rejected before transmission. Terminal.
    Request,
    /// The response body could not be read. Terminal.
    Body,
    /// The response could not be decoded. Terminal.
    Decode,
}

impl TransportFailure {
    /// Map a reqwest error onto a failure kind. Ambiguous errors default to
    /// the terminal `Request` kind.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if err.is_body() {
            TransportFailure::Body
        } else if err.is_decode() {
            TransportFailure::Decode
        } else {
            TransportFailure::Request
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, TransportFailure::Timeout | TransportFailure::Connect)
    }
}

/// Outcome of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryDecision {
    pub retryable: bool,
    pub source: DecisionSource,
    /// Error code extracted from a JSON error body, when present.
    pub error_code: Option<String>,
    /// Parsed `retry-after` header on 429, when present.
    pub retry_after_secs: Option<u64>,
}

/// Classify an HTTP outcome.
///
/// Precedence: transport error without a status first, then specific status
/// codes, then the 4xx/5xx defaults.
pub fn classify(
    status: Option<u16>,
    body: Option<&str>,
    headers: &HeaderMap,
    transport_error: Option<&TransportFailure>,
) -> RetryDecision {
    if status.is_none() {
        let retryable = transport_error.map(|f| f.is_retryable()).unwrap_or(false);
        return RetryDecision {
            retryable,
            source: DecisionSource::HttpStatus,
            error_code: None,
            retry_after_secs: None,
        };
    }

    match status.unwrap_or_default() {
        429 => RetryDecision {
            retryable: true,
            source: DecisionSource::HttpStatus,
            error_code: None,
            retry_after_secs: parse_retry_after(headers),
        },
        // Policy violations are never retried, whether or not the body parses.
        422 => RetryDecision {
            retryable: false,
            source: DecisionSource::HttpStatus,
            error_code: extract_error_code(body),
            retry_after_secs: None,
        },
        400 => {
            let error_code = extract_error_code(body);
            let source = if error_code.is_some() {
                DecisionSource::HttpStatus
            } else {
                DecisionSource::ParseFailedDefault
            };
            RetryDecision {
                retryable: false,
                source,
                error_code,
                retry_after_secs: None,
            }
        }
        code if (400..500).contains(&code) => RetryDecision {
            retryable: false,
            source: DecisionSource::HttpStatus,
            error_code: None,
            retry_after_secs: None,
        },
        code if code >= 500 => RetryDecision {
            retryable: true,
            source: DecisionSource::HttpStatus,
            error_code: None,
            retry_after_secs: None,
        },
        _ => RetryDecision {
            retryable: false,
            source: DecisionSource::HttpStatus,
            error_code: None,
            retry_after_secs: None,
        },
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn extract_error_code(body: Option<&str>) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body?).ok()?;
    parsed.get("error")?.as_str().map(str::to_string)
}
