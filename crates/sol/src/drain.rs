// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sol drain` command implementation.
//!
//! Drives the queue-processing cycle in a poll loop. Each cycle delivers at
//! most one transmission, so the loop runs until the queued set is empty.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use sol_core::types::TransmissionStatus;
use sol_core::{ChatStore, SolError};
use sol_outbox::OutboxEngine;
use sol_storage::SqliteStore;

/// Run the `sol drain` command.
///
/// With `once`, runs a single delivery cycle and returns. Otherwise invokes
/// `process_queue` every `poll_interval_secs` until nothing is queued.
pub async fn run_drain(
    store: &Arc<SqliteStore>,
    engine: &OutboxEngine,
    poll_interval_secs: u64,
    once: bool,
) -> Result<(), SolError> {
    if once {
        engine.process_queue().await;
        return Ok(());
    }

    let mut delivered = 0usize;
    loop {
        engine.process_queue().await;
        delivered += 1;

        let remaining = store
            .transmissions_by_status(TransmissionStatus::Queued)
            .await?;
        if remaining.is_empty() {
            break;
        }
        debug!(remaining = remaining.len(), "queue not empty, sleeping");
        tokio::time::sleep(Duration::from_secs(poll_interval_secs)).await;
    }

    println!("queue drained ({delivered} cycle(s))");
    Ok(())
}
