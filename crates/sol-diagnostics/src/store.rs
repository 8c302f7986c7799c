// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded ring buffer of redacted HTTP exchange records.
//!
//! Not on the delivery critical path: entries exist purely for debugging.
//! The buffer is mutex-guarded so transport instrumentation stays safe even
//! when exchanges overlap.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::redact::{redact_headers, redact_url, REDACTED};

/// Maximum number of entries retained. Inserting past this evicts the oldest.
pub const DIAGNOSTICS_CAPACITY: usize = 50;

/// Redacted record of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct DiagnosticsEntry {
    pub recorded_at: String,
    pub method: String,
    /// URL with sensitive query-parameter values masked.
    pub url: String,
    pub status: Option<u16>,
    pub latency_ms: u64,
    /// Retry classification of the outcome, when one was computed.
    pub retryable: Option<bool>,
    pub error: Option<String>,
    /// Request headers with sensitive names stripped.
    pub headers: Vec<(String, String)>,
    pub body_snippet: Option<String>,
    /// Redirect hops observed during this exchange, formatted `from -> to`.
    pub redirects: Vec<String>,
}

impl DiagnosticsEntry {
    /// Start a redacted entry for an outgoing request. The caller fills in
    /// the outcome fields once the exchange completes.
    pub fn for_request(method: &str, url: &str, headers: &[(String, String)]) -> Self {
        Self {
            recorded_at: chrono::Utc::now().to_rfc3339(),
            method: method.to_string(),
            url: redact_url(url),
            status: None,
            latency_ms: 0,
            retryable: None,
            error: None,
            headers: redact_headers(headers),
            body_snippet: None,
            redirects: Vec::new(),
        }
    }
}

/// Fixed-capacity, newest-first diagnostics buffer.
///
/// Constructed once at process start and injected into the transport; there
/// is deliberately no global instance.
pub struct DiagnosticsStore {
    entries: Mutex<VecDeque<DiagnosticsEntry>>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(DIAGNOSTICS_CAPACITY)),
        }
    }

    /// Insert an entry, evicting the oldest when the buffer is full.
    pub fn record(&self, entry: DiagnosticsEntry) {
        let mut entries = self.entries.lock().expect("diagnostics lock poisoned");
        if entries.len() == DIAGNOSTICS_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Current entries, newest first.
    pub fn snapshot(&self) -> Vec<DiagnosticsEntry> {
        let entries = self.entries.lock().expect("diagnostics lock poisoned");
        entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("diagnostics lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text dump of the buffer, newest first, for bug reports.
    ///
    /// All sensitive material was redacted at record time; the dump names
    /// the marker so readers know what the placeholder stands for.
    pub fn export(&self) -> String {
        let mut out = String::new();
        out.push_str("sol diagnostics export\n");
        out.push_str(&format!("generated: {}\n", chrono::Utc::now().to_rfc3339()));
        out.push_str(&format!("sensitive values are shown as {REDACTED}\n\n"));

        for (i, entry) in self.snapshot().iter().enumerate() {
            out.push_str(&format!(
                "#{i} [{}] {} {}\n",
                entry.recorded_at, entry.method, entry.url
            ));
            match entry.status {
                Some(status) => out.push_str(&format!(
                    "    status={status} latency_ms={}\n",
                    entry.latency_ms
                )),
                None => out.push_str(&format!("    no response latency_ms={}\n", entry.latency_ms)),
            }
            if let Some(retryable) = entry.retryable {
                out.push_str(&format!("    retryable={retryable}\n"));
            }
            if let Some(error) = &entry.error {
                out.push_str(&format!("    error={error}\n"));
            }
            for hop in &entry.redirects {
                out.push_str(&format!("    redirect {hop}\n"));
            }
            if let Some(snippet) = &entry.body_snippet {
                out.push_str(&format!("    body: {snippet}\n"));
            }
            out.push('\n');
        }

        out
    }

    /// Equivalent command-line reproduction of one exchange, with all
    /// sensitive values already redacted.
    pub fn curl_command(entry: &DiagnosticsEntry) -> String {
        let mut cmd = format!("curl -sS -X {} '{}'", entry.method, entry.url);
        for (name, value) in &entry.headers {
            cmd.push_str(&format!(" -H '{name}: {value}'"));
        }
        if let Some(snippet) = &entry.body_snippet {
            cmd.push_str(&format!(" --data '{}'", snippet.replace('\'', "'\\''")));
        }
        cmd
    }
}

impl Default for DiagnosticsStore {
    fn default() -> Self {
        Self::new()
    }
}
