// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for delivering packet envelopes to the chat server.
//!
//! `send` is the one required capability. Polling and memento decisions are
//! optional extensions: callers probe for them through the accessor methods
//! rather than downcasting, and a transport that does not support one simply
//! leaves the default `None`.

use async_trait::async_trait;

use crate::error::SolError;
use crate::types::{DecisionReply, MementoDecision, PacketEnvelope, PollReply, SendReply};

/// Protocol seam between the outbox engine and the chat server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Human-readable transport name, for logging.
    fn name(&self) -> &str;

    /// Delivers one envelope and decodes the server's reply.
    async fn send(&self, envelope: &PacketEnvelope) -> Result<SendReply, SolError>;

    /// Optional capability: poll a pending server-side transmission.
    fn polling(&self) -> Option<&dyn PollingTransport> {
        None
    }

    /// Optional capability: submit memento keep/discard decisions.
    fn mementos(&self) -> Option<&dyn MementoTransport> {
        None
    }
}

/// Extension for transports that can poll long-running server processing.
#[async_trait]
pub trait PollingTransport: Send + Sync {
    async fn poll(&self, transmission_id: &str) -> Result<PollReply, SolError>;
}

/// Extension for transports that can submit memento decisions.
#[async_trait]
pub trait MementoTransport: Send + Sync {
    async fn decide_memento(
        &self,
        thread_id: &str,
        memento_id: &str,
        decision: MementoDecision,
    ) -> Result<DecisionReply, SolError>;
}
