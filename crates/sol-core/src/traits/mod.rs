// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the outbox engine and its collaborators.

pub mod store;
pub mod transport;

pub use store::ChatStore;
pub use transport::{ChatTransport, MementoTransport, PollingTransport};
