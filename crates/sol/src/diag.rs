// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sol diag` command implementation.
//!
//! The diagnostics buffer lives in process memory, so the export covers
//! exchanges made during this invocation only.

use sol_core::SolError;
use sol_diagnostics::DiagnosticsStore;

/// Run the `sol diag` command.
pub fn run_diag(diagnostics: &DiagnosticsStore) -> Result<(), SolError> {
    print!("{}", diagnostics.export());
    if diagnostics.is_empty() {
        println!("(no exchanges recorded in this run)");
    }
    Ok(())
}
