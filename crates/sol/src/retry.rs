// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sol retry` command implementation.

use std::sync::Arc;

use sol_core::types::TransmissionStatus;
use sol_core::{ChatStore, SolError};
use sol_outbox::OutboxEngine;
use sol_storage::SqliteStore;

/// Run the `sol retry` command.
///
/// Re-queues every failed transmission and reports how many moved; the next
/// `sol drain` delivers them.
pub async fn run_retry(store: &Arc<SqliteStore>, engine: &OutboxEngine) -> Result<(), SolError> {
    let failed = store
        .transmissions_by_status(TransmissionStatus::Failed)
        .await?;
    if failed.is_empty() {
        println!("no failed transmissions");
        return Ok(());
    }

    engine.retry_failed().await;

    let still_failed = store
        .transmissions_by_status(TransmissionStatus::Failed)
        .await?;
    println!(
        "re-queued {} of {} failed transmission(s)",
        failed.len() - still_failed.len(),
        failed.len()
    );
    Ok(())
}
