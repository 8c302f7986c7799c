// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat transport for deterministic testing.
//!
//! `MockTransport` implements `ChatTransport` with pre-configured replies,
//! enabling fast, CI-runnable tests without a chat server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use sol_core::types::{PacketEnvelope, SendReply};
use sol_core::{ChatTransport, SolError};

/// A mock transport that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock reply" text is returned. With `failing_on_debug()`, any envelope
/// whose packet kind simulates failure is rejected with a simulated-failure
/// error, mirroring the dev server's behavior.
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<SendReply, SolError>>>,
    sent: Mutex<Vec<PacketEnvelope>>,
    calls: AtomicUsize,
    fail_on_debug_kind: bool,
}

impl MockTransport {
    /// Create a mock transport with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_on_debug_kind: false,
        }
    }

    /// Create a mock transport pre-loaded with the given reply texts.
    pub fn with_replies(texts: Vec<String>) -> Self {
        let transport = Self::new();
        {
            let mut replies = transport.replies.try_lock().expect("fresh mutex");
            for text in texts {
                replies.push_back(Ok(text_reply(&text)));
            }
        }
        transport
    }

    /// Reject debug-fail envelopes with a simulated failure.
    pub fn failing_on_debug(mut self) -> Self {
        self.fail_on_debug_kind = true;
        self
    }

    /// Queue a successful reply.
    pub async fn add_reply(&self, text: &str) {
        self.replies.lock().await.push_back(Ok(text_reply(text)));
    }

    /// Queue a failure.
    pub async fn add_failure(&self, error: SolError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Number of send calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Envelopes seen so far, in call order.
    pub async fn sent_envelopes(&self) -> Vec<PacketEnvelope> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn text_reply(text: &str) -> SendReply {
    SendReply {
        text: text.to_string(),
        transmission_id: None,
        pending: false,
        idempotent_replay: false,
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, envelope: &PacketEnvelope) -> Result<SendReply, SolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(envelope.clone());

        if self.fail_on_debug_kind && envelope.kind.simulates_failure() {
            return Err(SolError::SimulatedFailure { status: 500 });
        }

        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(text_reply("mock reply")))
    }
}
