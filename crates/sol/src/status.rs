// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sol status` command implementation.
//!
//! Lists every transmission with its status, last error, and delivery
//! attempt count. `--json` outputs structured JSON for scripting.

use std::sync::Arc;

use serde::Serialize;

use sol_core::types::TransmissionStatus;
use sol_core::{ChatStore, SolError};
use sol_storage::SqliteStore;

const ALL_STATUSES: [TransmissionStatus; 5] = [
    TransmissionStatus::Queued,
    TransmissionStatus::Sending,
    TransmissionStatus::Pending,
    TransmissionStatus::Succeeded,
    TransmissionStatus::Failed,
];

/// One row of status output.
#[derive(Debug, Serialize)]
pub struct StatusLine {
    pub id: String,
    pub status: String,
    pub created_at: String,
    pub attempts: usize,
    pub last_error: Option<String>,
}

/// Summarize status lines into a compact count string, queued first.
fn summarize(lines: &[StatusLine]) -> String {
    let mut parts = Vec::new();
    for status in ALL_STATUSES {
        let name = status.to_string();
        let count = lines.iter().filter(|l| l.status == name).count();
        if count > 0 {
            parts.push(format!("{count} {name}"));
        }
    }
    if parts.is_empty() {
        "empty".to_string()
    } else {
        parts.join(", ")
    }
}

/// Run the `sol status` command.
pub async fn run_status(store: &Arc<SqliteStore>, json: bool) -> Result<(), SolError> {
    let mut lines = Vec::new();
    for status in ALL_STATUSES {
        for transmission in store.transmissions_by_status(status).await? {
            let attempts = store
                .attempts_for_transmission(&transmission.id)
                .await?
                .len();
            lines.push(StatusLine {
                id: transmission.id,
                status: status.to_string(),
                created_at: transmission.created_at,
                attempts,
                last_error: transmission.last_error,
            });
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&lines).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    println!();
    println!("  sol outbox status ({})", summarize(&lines));
    println!("  {}", "-".repeat(35));
    if lines.is_empty() {
        println!("    no transmissions");
    }
    for line in &lines {
        println!(
            "    {}  {:<9}  attempts={}  created={}",
            line.id, line.status, line.attempts, line.created_at
        );
        if let Some(error) = &line.last_error {
            println!("      error: {error}");
        }
    }
    println!();
    Ok(())
}
