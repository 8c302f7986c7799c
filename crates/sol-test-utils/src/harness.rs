// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles the full outbox stack over an in-memory SQLite
//! store and a mock transport. `post_user_message()` persists a user message
//! and enqueues it, so tests drive the same path the application does.

use std::sync::Arc;

use sol_core::types::{Message, Sender, Thread, Transmission, TransmissionStatus};
use sol_core::{ChatStore, ChatTransport, SolError};
use sol_outbox::OutboxEngine;
use sol_storage::SqliteStore;

use crate::mock_transport::MockTransport;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<String>,
    fail_on_debug: bool,
    debug_fail_prefix: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            fail_on_debug: false,
            debug_fail_prefix: "#fail".to_string(),
        }
    }

    /// Pre-load the mock transport with reply texts.
    pub fn with_mock_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Make the mock transport reject debug-fail envelopes, mirroring the
    /// dev server's simulate-status behavior.
    pub fn failing_on_debug(mut self) -> Self {
        self.fail_on_debug = true;
        self
    }

    /// Override the prefix that marks a message as a debug-fail send.
    pub fn with_debug_fail_prefix(mut self, prefix: &str) -> Self {
        self.debug_fail_prefix = prefix.to_string();
        self
    }

    /// Build the test harness, initializing the in-memory store.
    pub async fn build(self) -> Result<TestHarness, SolError> {
        let store = Arc::new(SqliteStore::in_memory());
        store.initialize().await?;

        let mut transport = if self.replies.is_empty() {
            MockTransport::new()
        } else {
            MockTransport::with_replies(self.replies)
        };
        if self.fail_on_debug {
            transport = transport.failing_on_debug();
        }
        let transport = Arc::new(transport);

        let engine = OutboxEngine::new(
            Arc::clone(&store) as Arc<dyn ChatStore>,
            Arc::clone(&transport) as Arc<dyn ChatTransport>,
            self.debug_fail_prefix,
        );

        Ok(TestHarness {
            store,
            transport,
            engine,
        })
    }
}

/// A complete test environment: in-memory store, mock transport, and the
/// outbox engine wired over both.
pub struct TestHarness {
    /// The in-memory store (dropped with the harness).
    pub store: Arc<SqliteStore>,
    /// The mock transport, for scripting replies and inspecting calls.
    pub transport: Arc<MockTransport>,
    /// The outbox engine under test.
    pub engine: OutboxEngine,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create and persist a thread.
    pub async fn start_thread(&self, title: &str) -> Result<Thread, SolError> {
        let now = chrono::Utc::now().to_rfc3339();
        let thread = Thread {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            last_active_at: now.clone(),
            created_at: now,
        };
        self.store.create_thread(&thread).await?;
        Ok(thread)
    }

    /// Persist a user message on the thread and enqueue it for delivery,
    /// the same sequence the application performs on a chat send.
    pub async fn post_user_message(
        &self,
        thread: &Thread,
        text: &str,
    ) -> Result<Message, SolError> {
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread.id.clone(),
            sender: Sender::User,
            text: text.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.insert_message(&message).await?;
        self.store
            .touch_thread(&thread.id, &message.created_at)
            .await?;
        self.engine.enqueue_chat(thread, &message).await;
        Ok(message)
    }

    /// Transmissions currently in the given status, oldest first.
    pub async fn transmissions(
        &self,
        status: TransmissionStatus,
    ) -> Result<Vec<Transmission>, SolError> {
        self.store.transmissions_by_status(status).await
    }

    /// All messages on a thread in chronological order.
    pub async fn thread_messages(&self, thread_id: &str) -> Result<Vec<Message>, SolError> {
        self.store.messages_for_thread(thread_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        let queued = harness
            .transmissions(TransmissionStatus::Queued)
            .await
            .unwrap();
        assert!(queued.is_empty());
    }

    #[tokio::test]
    async fn post_user_message_persists_and_enqueues() {
        let harness = TestHarness::builder().build().await.unwrap();
        let thread = harness.start_thread("Harness test").await.unwrap();

        harness.post_user_message(&thread, "hello").await.unwrap();

        let messages = harness.thread_messages(&thread.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::User);

        let queued = harness
            .transmissions(TransmissionStatus::Queued)
            .await
            .unwrap();
        assert_eq!(queued.len(), 1);
    }

    #[tokio::test]
    async fn stores_are_isolated_per_harness() {
        let h1 = TestHarness::builder().build().await.unwrap();
        let h2 = TestHarness::builder().build().await.unwrap();

        let thread = h1.start_thread("only in h1").await.unwrap();
        h1.post_user_message(&thread, "msg").await.unwrap();

        assert_eq!(h1.transmissions(TransmissionStatus::Queued).await.unwrap().len(), 1);
        assert!(h2.transmissions(TransmissionStatus::Queued).await.unwrap().is_empty());
    }
}
