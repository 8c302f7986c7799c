// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sol send` command implementation.
//!
//! Persists a user message (creating the thread when needed), enqueues it,
//! and runs a single delivery cycle so the common case gets an immediate
//! answer. A backlog is drained with `sol drain`.

use std::sync::Arc;

use sol_core::types::{Message, Sender, Thread, TransmissionStatus};
use sol_core::{ChatStore, SolError};
use sol_outbox::OutboxEngine;
use sol_storage::SqliteStore;

/// Thread titles derived from the first message are capped at this length.
const TITLE_MAX: usize = 48;

/// Derive a thread title from the first message text.
fn derive_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "New thread".to_string();
    }
    let mut title: String = trimmed.chars().take(TITLE_MAX).collect();
    if trimmed.chars().count() > TITLE_MAX {
        title.push('…');
    }
    title
}

/// Run the `sol send` command.
pub async fn run_send(
    store: &Arc<SqliteStore>,
    engine: &OutboxEngine,
    thread_id: Option<String>,
    message_text: &str,
) -> Result<(), SolError> {
    let now = chrono::Utc::now().to_rfc3339();

    let thread = match thread_id {
        Some(id) => store
            .get_thread(&id)
            .await?
            .ok_or_else(|| SolError::Internal(format!("no such thread: {id}")))?,
        None => {
            let thread = Thread {
                id: uuid::Uuid::new_v4().to_string(),
                title: derive_title(message_text),
                last_active_at: now.clone(),
                created_at: now.clone(),
            };
            store.create_thread(&thread).await?;
            println!("created thread {}", thread.id);
            thread
        }
    };

    let user_message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        thread_id: thread.id.clone(),
        sender: Sender::User,
        text: message_text.to_string(),
        created_at: now.clone(),
    };
    store.insert_message(&user_message).await?;
    store.touch_thread(&thread.id, &now).await?;

    let assistant_before = count_assistant(store, &thread.id).await?;

    engine.enqueue_chat(&thread, &user_message).await;
    engine.process_queue().await;

    // Report what the cycle did. With a backlog, the processed head may not
    // be the message just enqueued.
    let messages = store.messages_for_thread(&thread.id).await?;
    let assistant: Vec<&Message> = messages
        .iter()
        .filter(|m| m.sender == Sender::Assistant)
        .collect();
    if assistant.len() > assistant_before {
        if let Some(reply) = assistant.last() {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    let failed = store
        .transmissions_by_status(TransmissionStatus::Failed)
        .await?;
    if let Some(last) = failed.last() {
        println!(
            "delivery failed: {} (run `sol retry` to re-queue)",
            last.last_error.as_deref().unwrap_or("unknown error")
        );
    } else {
        println!("message queued; run `sol drain` to deliver the backlog");
    }
    Ok(())
}

async fn count_assistant(store: &Arc<SqliteStore>, thread_id: &str) -> Result<usize, SolError> {
    Ok(store
        .messages_for_thread(thread_id)
        .await?
        .iter()
        .filter(|m| m.sender == Sender::Assistant)
        .count())
}
