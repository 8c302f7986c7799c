// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps one `tokio_rusqlite::Connection`, query modules
//! accept `&Database` and go through `conn.call()`, and no second connection
//! is ever created for writes. This eliminates SQLITE_BUSY under concurrent
//! callers.

use std::time::Duration;

use sol_core::SolError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to the single serialized SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and run pending migrations.
    ///
    /// The literal path `:memory:` opens a non-durable in-memory database
    /// for testing; WAL mode is skipped in that case.
    pub async fn open(path: &str) -> Result<Self, SolError> {
        Self::open_with_options(path, true).await
    }

    /// Open without WAL mode (used when `storage.wal_mode = false`).
    pub async fn open_without_wal(path: &str) -> Result<Self, SolError> {
        Self::open_with_options(path, false).await
    }

    /// Open an in-memory database for tests.
    pub async fn open_in_memory() -> Result<Self, SolError> {
        Self::open_with_options(":memory:", false).await
    }

    async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, SolError> {
        let in_memory = path == ":memory:";

        if !in_memory
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| SolError::Storage { source: Box::new(e) })?;
        }

        let conn = if in_memory {
            Connection::open_in_memory().await
        } else {
            Connection::open(path).await
        }
        .map_err(|e| SolError::Storage { source: Box::new(e) })?;

        let use_wal = wal_mode && !in_memory;
        conn.call(move |conn| {
            if use_wal {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // Migration failures are surfaced as strings so the refinery error
        // does not have to cross the connection thread boundary.
        let migration_result = conn
            .call(|conn| Ok(crate::migrations::run_migrations(conn).map_err(|e| e.to_string())))
            .await
            .map_err(map_tr_err)?;
        migration_result.map_err(|msg| SolError::Storage { source: msg.into() })?;

        debug!(path, wal = use_wal, "database opened");
        Ok(Self { conn })
    }

    /// The underlying serialized connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), SolError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into the workspace storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> SolError {
    SolError::Storage { source: Box::new(e) }
}
