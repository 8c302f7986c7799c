// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The outbox engine: durable queueing and single-flight delivery.
//!
//! `process_queue` handles only the head of the queue per invocation and
//! runs it to completion, so at most one transmission is ever in `sending`.
//! The caller drives the loop; the engine must not be invoked concurrently
//! with itself.
//!
//! Durable safety discipline: entity ids are snapshotted before the network
//! await, and every mutation afterwards goes through a fresh re-fetch by id.
//! A handle captured before the await is never written through.
//!
//! None of the public operations propagate errors: they are designed to be
//! safe on a timer loop, recovering locally and logging at warn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sol_core::types::{
    DeliveryAttempt, Message, Packet, PacketEnvelope, PacketKind, Sender, Thread, Transmission,
    TransmissionStatus,
};
use sol_core::{ChatStore, ChatTransport};

/// Orchestrates packet creation, delivery, and reconciliation against the
/// durable store.
pub struct OutboxEngine {
    store: Arc<dyn ChatStore>,
    transport: Arc<dyn ChatTransport>,
    debug_fail_prefix: String,
}

impl OutboxEngine {
    /// Creates an engine over the given store and transport.
    ///
    /// `debug_fail_prefix` marks messages that should be enqueued as
    /// debug-fail packets (trimmed, case-insensitive prefix match).
    pub fn new(
        store: Arc<dyn ChatStore>,
        transport: Arc<dyn ChatTransport>,
        debug_fail_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            debug_fail_prefix: debug_fail_prefix.into().to_lowercase(),
        }
    }

    /// Creates a packet and a queued transmission for an already-persisted
    /// user message. No network activity; persistence errors are logged and
    /// swallowed.
    pub async fn enqueue_chat(&self, thread: &Thread, user_message: &Message) {
        let kind = if user_message
            .text
            .trim()
            .to_lowercase()
            .starts_with(&self.debug_fail_prefix)
        {
            PacketKind::DebugFail
        } else {
            PacketKind::Chat
        };

        let now = chrono::Utc::now().to_rfc3339();
        let packet = Packet {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            thread_id: thread.id.clone(),
            message_ids: vec![user_message.id.clone()],
            context_json: None,
            payload_json: None,
            created_at: now.clone(),
        };
        let transmission = Transmission {
            id: uuid::Uuid::new_v4().to_string(),
            packet_id: packet.id.clone(),
            status: TransmissionStatus::Queued,
            last_error: None,
            created_at: now,
        };

        if let Err(e) = self.store.create_outbound(&packet, &transmission).await {
            warn!(
                thread = %thread.id,
                message = %user_message.id,
                error = %e,
                "failed to enqueue chat"
            );
            return;
        }
        debug!(
            transmission = %transmission.id,
            packet = %packet.id,
            kind = %packet.kind,
            "chat enqueued"
        );
    }

    /// Delivers the oldest queued transmission, if any.
    ///
    /// Only the queue head is processed per invocation; callers drain the
    /// queue by invoking this repeatedly.
    pub async fn process_queue(&self) {
        let queued = match self
            .store
            .transmissions_by_status(TransmissionStatus::Queued)
            .await
        {
            Ok(queued) => queued,
            Err(e) => {
                warn!(error = %e, "failed to fetch queued transmissions");
                return;
            }
        };
        let Some(head) = queued.into_iter().next() else {
            return;
        };

        // Snapshot ids before the network await; everything after the send
        // re-fetches through these.
        let transmission_id = head.id.clone();
        let packet_id = head.packet_id.clone();

        let packet = match self.store.get_packet(&packet_id).await {
            Ok(Some(packet)) => packet,
            Ok(None) => {
                warn!(transmission = %transmission_id, packet = %packet_id, "packet missing for queued transmission");
                return;
            }
            Err(e) => {
                warn!(transmission = %transmission_id, error = %e, "failed to fetch packet");
                return;
            }
        };
        let thread_id = packet.thread_id.clone();
        let first_message_id = packet.message_ids.first().cloned();

        if let Err(e) = self.store.mark_sending(&transmission_id).await {
            warn!(transmission = %transmission_id, error = %e, "failed to mark sending");
            return;
        }

        // Resolve the outbound text through a durable lookup, not a held
        // reference.
        let text = match &first_message_id {
            Some(message_id) => match self.store.get_message(message_id).await {
                Ok(Some(message)) => message.text,
                Ok(None) => {
                    self.fail_transmission(&transmission_id, "outbound message no longer exists")
                        .await;
                    return;
                }
                Err(e) => {
                    warn!(transmission = %transmission_id, error = %e, "failed to resolve outbound message");
                    return;
                }
            },
            None => {
                self.fail_transmission(&transmission_id, "packet carries no messages")
                    .await;
                return;
            }
        };

        let envelope = PacketEnvelope {
            packet_id: packet.id.clone(),
            kind: packet.kind,
            thread_id: thread_id.clone(),
            message_ids: packet.message_ids.clone(),
            text,
            context_json: packet.context_json.clone(),
            payload_json: packet.payload_json.clone(),
        };

        let attempt_started = chrono::Utc::now().to_rfc3339();

        // Suspension point: nothing durable is held across this await.
        let outcome = self.transport.send(&envelope).await;

        match outcome {
            Ok(reply) => {
                // Re-fetch; the transmission may have been deleted while the
                // send was in flight.
                match self.store.get_transmission(&transmission_id).await {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        debug!(transmission = %transmission_id, "transmission gone after send, aborting");
                        return;
                    }
                    Err(e) => {
                        warn!(transmission = %transmission_id, error = %e, "failed to re-fetch transmission");
                        return;
                    }
                }

                match self.store.get_thread(&thread_id).await {
                    Ok(Some(thread)) => {
                        let now = chrono::Utc::now().to_rfc3339();
                        let assistant = Message {
                            id: uuid::Uuid::new_v4().to_string(),
                            thread_id: thread.id.clone(),
                            sender: Sender::Assistant,
                            text: reply.text.clone(),
                            created_at: now.clone(),
                        };
                        if let Err(e) = self.store.insert_message(&assistant).await {
                            warn!(thread = %thread.id, error = %e, "failed to append assistant message");
                        } else if let Err(e) = self.store.touch_thread(&thread.id, &now).await {
                            warn!(thread = %thread.id, error = %e, "failed to touch thread");
                        }
                    }
                    Ok(None) => {
                        debug!(thread = %thread_id, "thread gone after send, skipping assistant append");
                    }
                    Err(e) => {
                        warn!(thread = %thread_id, error = %e, "failed to re-fetch thread");
                    }
                }

                if let Err(e) = self.store.mark_succeeded(&transmission_id).await {
                    warn!(transmission = %transmission_id, error = %e, "failed to mark succeeded");
                }
                let detail = reply.pending.then(|| "pending".to_string());
                self.record_attempt(&transmission_id, &attempt_started, "succeeded", detail)
                    .await;
                info!(transmission = %transmission_id, packet = %packet_id, "delivery succeeded");
            }
            Err(err) => {
                let description = err.to_string();
                match self.store.get_transmission(&transmission_id).await {
                    Ok(Some(_)) => {
                        if let Err(e) = self.store.mark_failed(&transmission_id, &description).await
                        {
                            warn!(transmission = %transmission_id, error = %e, "failed to mark failed");
                        }
                    }
                    Ok(None) => {
                        debug!(transmission = %transmission_id, "transmission gone after send, aborting");
                        return;
                    }
                    Err(e) => {
                        warn!(transmission = %transmission_id, error = %e, "failed to re-fetch transmission");
                        return;
                    }
                }
                self.record_attempt(
                    &transmission_id,
                    &attempt_started,
                    "failed",
                    Some(description.clone()),
                )
                .await;
                warn!(transmission = %transmission_id, error = %description, "delivery failed");
            }
        }
    }

    /// Re-queues every failed transmission.
    ///
    /// A packet still carrying the debug-fail kind is flipped back to a
    /// normal chat packet first (one-shot), so a manually retried debug
    /// failure succeeds on its next attempt instead of failing forever.
    pub async fn retry_failed(&self) {
        let failed = match self
            .store
            .transmissions_by_status(TransmissionStatus::Failed)
            .await
        {
            Ok(failed) => failed,
            Err(e) => {
                warn!(error = %e, "failed to fetch failed transmissions");
                return;
            }
        };

        for transmission in failed {
            match self.store.get_packet(&transmission.packet_id).await {
                Ok(Some(packet)) if packet.kind.simulates_failure() => {
                    if let Err(e) = self.store.set_packet_kind(&packet.id, PacketKind::Chat).await {
                        warn!(packet = %packet.id, error = %e, "failed to reset debug-fail packet");
                        continue;
                    }
                    info!(packet = %packet.id, "debug-fail packet reset to chat for retry");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(transmission = %transmission.id, error = %e, "failed to fetch packet for retry");
                    continue;
                }
            }

            if let Err(e) = self.store.requeue(&transmission.id).await {
                warn!(transmission = %transmission.id, error = %e, "failed to re-queue transmission");
                continue;
            }
            debug!(transmission = %transmission.id, "failed transmission re-queued");
        }
    }

    async fn fail_transmission(&self, transmission_id: &str, reason: &str) {
        warn!(transmission = %transmission_id, reason, "delivery aborted");
        if let Err(e) = self.store.mark_failed(transmission_id, reason).await {
            warn!(transmission = %transmission_id, error = %e, "failed to mark failed");
        }
    }

    async fn record_attempt(
        &self,
        transmission_id: &str,
        started_at: &str,
        outcome: &str,
        detail: Option<String>,
    ) {
        let attempt = DeliveryAttempt {
            id: uuid::Uuid::new_v4().to_string(),
            transmission_id: transmission_id.to_string(),
            started_at: started_at.to_string(),
            outcome: outcome.to_string(),
            detail,
        };
        if let Err(e) = self.store.record_attempt(&attempt).await {
            warn!(transmission = %transmission_id, error = %e, "failed to record delivery attempt");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sol_core::types::SendReply;
    use sol_core::SolError;
    use sol_storage::SqliteStore;

    /// Transport double with scripted replies and a call counter.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<SendReply, SolError>>>,
        calls: AtomicUsize,
        fail_on_debug_kind: bool,
    }

    impl ScriptedTransport {
        fn succeeding() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                fail_on_debug_kind: false,
            }
        }

        fn failing_on_debug() -> Self {
            Self {
                fail_on_debug_kind: true,
                ..Self::succeeding()
            }
        }

        fn with_replies(replies: Vec<Result<SendReply, SolError>>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                ..Self::succeeding()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn reply(text: &str) -> SendReply {
        SendReply {
            text: text.to_string(),
            transmission_id: None,
            pending: false,
            idempotent_replay: false,
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, envelope: &PacketEnvelope) -> Result<SendReply, SolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_debug_kind && envelope.kind.simulates_failure() {
                return Err(SolError::SimulatedFailure { status: 500 });
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(reply("scripted reply")))
        }
    }

    struct Fixture {
        engine: OutboxEngine,
        store: Arc<SqliteStore>,
        transport: Arc<ScriptedTransport>,
        thread: Thread,
    }

    async fn fixture(transport: ScriptedTransport) -> Fixture {
        let store = Arc::new(SqliteStore::in_memory());
        store.initialize().await.unwrap();
        let transport = Arc::new(transport);
        let engine = OutboxEngine::new(
            Arc::clone(&store) as Arc<dyn ChatStore>,
            Arc::clone(&transport) as Arc<dyn ChatTransport>,
            "#fail",
        );

        let thread = Thread {
            id: "t1".to_string(),
            title: "Engine test".to_string(),
            last_active_at: "2026-01-01T00:00:00.000Z".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        store.create_thread(&thread).await.unwrap();

        Fixture {
            engine,
            store,
            transport,
            thread,
        }
    }

    async fn seed_message(fx: &Fixture, id: &str, text: &str) -> Message {
        let message = Message {
            id: id.to_string(),
            thread_id: fx.thread.id.clone(),
            sender: Sender::User,
            text: text.to_string(),
            created_at: "2026-01-01T00:00:01.000Z".to_string(),
        };
        fx.store.insert_message(&message).await.unwrap();
        message
    }

    async fn queued(fx: &Fixture) -> Vec<Transmission> {
        fx.store
            .transmissions_by_status(TransmissionStatus::Queued)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn enqueue_round_trip_references_thread_and_message() {
        let fx = fixture(ScriptedTransport::succeeding()).await;
        let message = seed_message(&fx, "m1", "hello").await;

        fx.engine.enqueue_chat(&fx.thread, &message).await;

        let queued = queued(&fx).await;
        assert_eq!(queued.len(), 1);
        let packet = fx.store.get_packet(&queued[0].packet_id).await.unwrap().unwrap();
        assert_eq!(packet.thread_id, "t1");
        assert_eq!(packet.message_ids, vec!["m1".to_string()]);
        assert_eq!(packet.kind, PacketKind::Chat);
    }

    #[tokio::test]
    async fn debug_prefix_is_detected_trimmed_case_insensitive() {
        let fx = fixture(ScriptedTransport::succeeding()).await;
        let message = seed_message(&fx, "m1", "  #FAIL this one  ").await;

        fx.engine.enqueue_chat(&fx.thread, &message).await;

        let queued = queued(&fx).await;
        let packet = fx.store.get_packet(&queued[0].packet_id).await.unwrap().unwrap();
        assert_eq!(packet.kind, PacketKind::DebugFail);
    }

    #[tokio::test]
    async fn successful_send_appends_exactly_one_assistant_message() {
        let fx = fixture(ScriptedTransport::with_replies(vec![Ok(reply("hi!"))])).await;
        let message = seed_message(&fx, "m1", "hello").await;
        fx.engine.enqueue_chat(&fx.thread, &message).await;
        let transmission_id = queued(&fx).await[0].id.clone();

        fx.engine.process_queue().await;

        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Succeeded);
        assert!(transmission.last_error.is_none());

        let messages = fx.store.messages_for_thread("t1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].text, "hi!");

        let attempts = fx.store.attempts_for_transmission(&transmission_id).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, "succeeded");
    }

    #[tokio::test]
    async fn failed_send_records_error_and_no_assistant_message() {
        let fx = fixture(ScriptedTransport::failing_on_debug()).await;
        let message = seed_message(&fx, "m1", "#fail deliberately").await;
        fx.engine.enqueue_chat(&fx.thread, &message).await;
        let transmission_id = queued(&fx).await[0].id.clone();

        fx.engine.process_queue().await;

        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Failed);
        let error = transmission.last_error.expect("failure must record an error");
        assert!(!error.is_empty());

        let messages = fx.store.messages_for_thread("t1").await.unwrap();
        assert_eq!(messages.len(), 1, "no assistant message on failure");

        let attempts = fx.store.attempts_for_transmission(&transmission_id).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, "failed");
    }

    #[tokio::test]
    async fn retry_flips_debug_kind_once_then_delivery_succeeds() {
        let fx = fixture(ScriptedTransport::failing_on_debug()).await;
        let message = seed_message(&fx, "m1", "#fail once").await;
        fx.engine.enqueue_chat(&fx.thread, &message).await;
        let transmission_id = queued(&fx).await[0].id.clone();

        // First attempt fails on the debug kind.
        fx.engine.process_queue().await;
        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Failed);

        // Manual retry: kind flips to chat, status back to queued, error cleared.
        fx.engine.retry_failed().await;
        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Queued);
        assert!(transmission.last_error.is_none());
        let packet = fx.store.get_packet(&transmission.packet_id).await.unwrap().unwrap();
        assert_eq!(packet.kind, PacketKind::Chat);

        // Next cycle succeeds end-to-end.
        fx.engine.process_queue().await;
        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Succeeded);
        let messages = fx.store.messages_for_thread("t1").await.unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn empty_queue_is_a_no_op() {
        let fx = fixture(ScriptedTransport::succeeding()).await;

        fx.engine.process_queue().await;

        assert_eq!(fx.transport.calls(), 0, "no transport call on empty queue");
        let messages = fx.store.messages_for_thread("t1").await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn only_the_oldest_queued_transmission_is_processed_per_call() {
        let fx = fixture(ScriptedTransport::succeeding()).await;
        seed_message(&fx, "m1", "first").await;
        seed_message(&fx, "m2", "second").await;

        // Controlled timestamps so FIFO order is unambiguous.
        for (n, ts) in [(1, "2026-01-01T00:00:01.000Z"), (2, "2026-01-01T00:00:02.000Z")] {
            let packet = Packet {
                id: format!("p{n}"),
                kind: PacketKind::Chat,
                thread_id: "t1".to_string(),
                message_ids: vec![format!("m{n}")],
                context_json: None,
                payload_json: None,
                created_at: ts.to_string(),
            };
            let transmission = Transmission {
                id: format!("tx{n}"),
                packet_id: format!("p{n}"),
                status: TransmissionStatus::Queued,
                last_error: None,
                created_at: ts.to_string(),
            };
            fx.store.create_outbound(&packet, &transmission).await.unwrap();
        }

        fx.engine.process_queue().await;

        assert_eq!(fx.transport.calls(), 1);
        let tx1 = fx.store.get_transmission("tx1").await.unwrap().unwrap();
        let tx2 = fx.store.get_transmission("tx2").await.unwrap().unwrap();
        assert_eq!(tx1.status, TransmissionStatus::Succeeded);
        assert_eq!(tx2.status, TransmissionStatus::Queued, "younger entry untouched");

        // A second cycle drains the next one.
        fx.engine.process_queue().await;
        let tx2 = fx.store.get_transmission("tx2").await.unwrap().unwrap();
        assert_eq!(tx2.status, TransmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn retry_requeues_plain_failures_without_touching_kind() {
        let fx = fixture(ScriptedTransport::with_replies(vec![Err(SolError::Http {
            status: 503,
            body: "overloaded".to_string(),
        })]))
        .await;
        let message = seed_message(&fx, "m1", "hello").await;
        fx.engine.enqueue_chat(&fx.thread, &message).await;
        let transmission_id = queued(&fx).await[0].id.clone();

        fx.engine.process_queue().await;
        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Failed);
        assert!(transmission.last_error.unwrap().contains("503"));

        fx.engine.retry_failed().await;
        let transmission = fx.store.get_transmission(&transmission_id).await.unwrap().unwrap();
        assert_eq!(transmission.status, TransmissionStatus::Queued);
        let packet = fx.store.get_packet(&transmission.packet_id).await.unwrap().unwrap();
        assert_eq!(packet.kind, PacketKind::Chat);
    }
}
