// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the Sol outbox pipeline.
//!
//! [`HttpChatTransport`] implements the `ChatTransport` seam against the
//! chat server, with pure retry classification in [`retry`], per-attempt
//! redirect capture in [`redirect`], and the wire DTOs in [`wire`]. The
//! memento vault client lives in [`mementos`].

pub mod http;
pub mod mementos;
pub mod redirect;
pub mod retry;
pub mod wire;

pub use http::{
    HttpChatTransport, MISSING_ASSISTANT_PLACEHOLDER, PENDING_PLACEHOLDER,
    SIMULATED_FAILURE_STATUS, SIMULATE_STATUS_HEADER,
};
pub use mementos::{MementoVaultClient, CLEAR_ALL_CONFIRMATION_PHRASE};
pub use redirect::{RedirectHop, RedirectTracker, MAX_RECORDED_HOPS};
pub use retry::{classify, DecisionSource, RetryDecision, TransportFailure};
