// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Sol outbox pipeline.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for threads, messages, packets, transmissions, and the
//! delivery-attempt audit trail.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use models::*;
pub use store::SqliteStore;
