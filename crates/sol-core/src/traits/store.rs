// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for the durable thread/message/packet/transmission records.
//!
//! The outbox engine only ever sees this seam. Implementations must be safe
//! to call with identifiers snapshotted before an await: every getter
//! re-reads current state by id, and every mutation is keyed by id rather
//! than by a held record.

use async_trait::async_trait;

use crate::error::SolError;
use crate::types::{
    DeliveryAttempt, Message, Packet, PacketKind, Thread, Transmission, TransmissionStatus,
};

/// Persistence seam for the outbox pipeline.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Initializes the backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), SolError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), SolError>;

    // --- Threads ---

    async fn create_thread(&self, thread: &Thread) -> Result<(), SolError>;

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, SolError>;

    /// Updates a thread's last-active timestamp.
    async fn touch_thread(&self, id: &str, last_active_at: &str) -> Result<(), SolError>;

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), SolError>;

    async fn get_message(&self, id: &str) -> Result<Option<Message>, SolError>;

    /// Messages for a thread in chronological order.
    async fn messages_for_thread(&self, thread_id: &str) -> Result<Vec<Message>, SolError>;

    // --- Outbound records ---

    /// Persists a packet and its transmission in one transaction.
    async fn create_outbound(
        &self,
        packet: &Packet,
        transmission: &Transmission,
    ) -> Result<(), SolError>;

    async fn get_packet(&self, id: &str) -> Result<Option<Packet>, SolError>;

    /// Rewrites a packet's kind. Used only for the one-shot debug-fail flip.
    async fn set_packet_kind(&self, id: &str, kind: PacketKind) -> Result<(), SolError>;

    async fn get_transmission(&self, id: &str) -> Result<Option<Transmission>, SolError>;

    /// Transmissions in the given status, oldest first.
    async fn transmissions_by_status(
        &self,
        status: TransmissionStatus,
    ) -> Result<Vec<Transmission>, SolError>;

    /// Moves a transmission to `sending` and clears its last error.
    async fn mark_sending(&self, id: &str) -> Result<(), SolError>;

    /// Terminal success. Never revisited.
    async fn mark_succeeded(&self, id: &str) -> Result<(), SolError>;

    /// Terminal-for-this-attempt failure with a human-readable description.
    async fn mark_failed(&self, id: &str, error: &str) -> Result<(), SolError>;

    /// Resets a failed transmission to `queued` and clears its last error.
    async fn requeue(&self, id: &str) -> Result<(), SolError>;

    // --- Delivery attempts ---

    async fn record_attempt(&self, attempt: &DeliveryAttempt) -> Result<(), SolError>;

    async fn attempts_for_transmission(
        &self,
        transmission_id: &str,
    ) -> Result<Vec<DeliveryAttempt>, SolError>;
}
