// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redaction of sensitive header and URL material before it enters the
//! diagnostics buffer.
//!
//! Two complementary mechanisms:
//! 1. **Header names**: any header whose name contains a sensitive marker
//!    (case-insensitive substring) is dropped entirely.
//! 2. **Query parameters**: values of a fixed set of parameter names
//!    (exact match) are masked in place.

use url::Url;

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Mask used for query-parameter values (kept bracket-free so it survives
/// URL encoding unmangled).
const QUERY_MASK: &str = "REDACTED";

/// Substring markers for sensitive header names.
const SENSITIVE_HEADER_MARKERS: &[&str] = &["authorization", "cookie", "api-key", "token", "secret"];

/// Query parameter names whose values are always masked.
const SENSITIVE_QUERY_PARAMS: &[&str] = &["api_key", "token", "sig", "signature", "expires"];

/// True when a header with this name must never be recorded.
pub fn is_sensitive_header(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    SENSITIVE_HEADER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Strip sensitive headers from a name/value list.
pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, _)| !is_sensitive_header(name))
        .cloned()
        .collect()
}

/// Mask sensitive query-parameter values in a URL.
///
/// Parameter names match exactly; everything else passes through untouched.
/// A URL that does not parse is returned as-is (it carries no query we could
/// interpret anyway).
pub fn redact_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        return raw.to_string();
    }

    {
        let mut rewritten = parsed.query_pairs_mut();
        rewritten.clear();
        for (name, value) in &pairs {
            if SENSITIVE_QUERY_PARAMS.contains(&name.as_str()) {
                rewritten.append_pair(name, QUERY_MASK);
            } else {
                rewritten.append_pair(name, value);
            }
        }
    }

    parsed.to_string()
}
