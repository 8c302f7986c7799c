// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sol integration tests.
//!
//! Provides a mock transport and a test harness for fast, deterministic,
//! CI-runnable tests without a chat server.
//!
//! # Components
//!
//! - [`MockTransport`] - Mock chat transport with pre-configured replies
//! - [`TestHarness`] - Complete pipeline over an in-memory store

pub mod harness;
pub mod mock_transport;

pub use harness::TestHarness;
pub use mock_transport::MockTransport;
