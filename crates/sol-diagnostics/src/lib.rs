// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redacted HTTP exchange diagnostics for the Sol outbox pipeline.
//!
//! A fixed-capacity ring buffer records one entry per exchange, with header
//! names and URL query values scrubbed before anything is stored. Purely a
//! debugging aid: nothing here influences delivery or retry decisions.

pub mod redact;
pub mod store;

pub use redact::{is_sensitive_header, redact_headers, redact_url, REDACTED};
pub use store::{DiagnosticsEntry, DiagnosticsStore, DIAGNOSTICS_CAPACITY};
