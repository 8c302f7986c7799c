// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbox engine for the Sol chat client.
//!
//! Turns an already-persisted user message into a durable packet plus
//! queued transmission, delivers the queue head one at a time through the
//! transport seam, and reconciles each outcome back onto the durable
//! records exactly once.

pub mod engine;

pub use engine::OutboxEngine;
