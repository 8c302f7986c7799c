// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the outbox pipeline.
//!
//! Timestamps are RFC3339 UTC strings stored as TEXT. String forms of the
//! enums below are stable: they are written to the database and must not
//! change between releases.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// The semantic type of an outbound packet.
///
/// `DebugFail` instructs the transport to ask the server for a simulated
/// error on the first delivery attempt. It is a typed flag rather than a
/// magic string so nothing outside the debug path can trigger it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PacketKind {
    Chat,
    DebugFail,
}

impl PacketKind {
    /// True when the transport should request a simulated server error.
    pub fn simulates_failure(&self) -> bool {
        matches!(self, PacketKind::DebugFail)
    }
}

/// Delivery state of a transmission.
///
/// `Pending` is an extension point for asynchronous server-side processing;
/// nothing transitions into it yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransmissionStatus {
    Queued,
    Sending,
    Pending,
    Succeeded,
    Failed,
}

/// A conversation thread. Messages live in their own table, ordered by
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub last_active_at: String,
    pub created_at: String,
}

/// One chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    pub sender: Sender,
    pub text: String,
    pub created_at: String,
}

/// A durable snapshot of one outbound user turn. Created once per enqueue;
/// never mutated except the one-shot `DebugFail` -> `Chat` flip on retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub id: String,
    pub kind: PacketKind,
    pub thread_id: String,
    pub message_ids: Vec<String>,
    pub context_json: Option<String>,
    pub payload_json: Option<String>,
    pub created_at: String,
}

/// The delivery record for exactly one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    pub id: String,
    pub packet_id: String,
    pub status: TransmissionStatus,
    pub last_error: Option<String>,
    pub created_at: String,
}

/// Append-only audit record of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub id: String,
    pub transmission_id: String,
    pub started_at: String,
    pub outcome: String,
    pub detail: Option<String>,
}

/// Transient snapshot of a packet plus resolved message text, built
/// immediately before a network send so no durable record is touched while
/// the call is in flight. Never persisted.
#[derive(Debug, Clone)]
pub struct PacketEnvelope {
    pub packet_id: String,
    pub kind: PacketKind,
    pub thread_id: String,
    pub message_ids: Vec<String>,
    pub text: String,
    pub context_json: Option<String>,
    pub payload_json: Option<String>,
}

/// Typed result of a successful `ChatTransport::send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReply {
    /// Assistant text, or a placeholder when the server answered 202/empty.
    pub text: String,
    /// Server-side transmission identifier, when assigned.
    pub transmission_id: Option<String>,
    /// The server accepted the message but is still processing it.
    pub pending: bool,
    /// The server recognized the idempotency key and replayed a prior reply.
    pub idempotent_replay: bool,
}

/// Typed result of `PollingTransport::poll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReply {
    pub pending: bool,
    pub server_status: Option<String>,
    pub text: Option<String>,
}

/// User verdict on a server-proposed memento.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MementoDecision {
    Keep,
    Discard,
}

/// Typed result of `MementoTransport::decide_memento`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReply {
    pub ok: bool,
    pub status: Option<String>,
}
