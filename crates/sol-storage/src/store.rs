// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ChatStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use sol_config::model::StorageConfig;
use sol_core::types::{
    DeliveryAttempt, Message, Packet, PacketKind, Thread, Transmission, TransmissionStatus,
};
use sol_core::{ChatStore, SolError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed chat store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`ChatStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Convenience constructor for the in-memory test mode.
    pub fn in_memory() -> Self {
        Self::new(StorageConfig {
            database_path: ":memory:".to_string(),
            wal_mode: false,
        })
    }

    fn db(&self) -> Result<&Database, SolError> {
        self.db.get().ok_or_else(|| SolError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl ChatStore for SqliteStore {
    async fn initialize(&self) -> Result<(), SolError> {
        let db = if self.config.wal_mode {
            Database::open(&self.config.database_path).await?
        } else {
            Database::open_without_wal(&self.config.database_path).await?
        };
        self.db.set(db).map_err(|_| SolError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SolError> {
        self.db()?.close().await
    }

    // --- Threads ---

    async fn create_thread(&self, thread: &Thread) -> Result<(), SolError> {
        queries::threads::create_thread(self.db()?, thread).await
    }

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, SolError> {
        queries::threads::get_thread(self.db()?, id).await
    }

    async fn touch_thread(&self, id: &str, last_active_at: &str) -> Result<(), SolError> {
        queries::threads::touch_thread(self.db()?, id, last_active_at).await
    }

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), SolError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn get_message(&self, id: &str) -> Result<Option<Message>, SolError> {
        queries::messages::get_message(self.db()?, id).await
    }

    async fn messages_for_thread(&self, thread_id: &str) -> Result<Vec<Message>, SolError> {
        queries::messages::get_messages_for_thread(self.db()?, thread_id).await
    }

    // --- Outbound records ---

    async fn create_outbound(
        &self,
        packet: &Packet,
        transmission: &Transmission,
    ) -> Result<(), SolError> {
        queries::transmissions::create_outbound(self.db()?, packet, transmission).await
    }

    async fn get_packet(&self, id: &str) -> Result<Option<Packet>, SolError> {
        queries::packets::get_packet(self.db()?, id).await
    }

    async fn set_packet_kind(&self, id: &str, kind: PacketKind) -> Result<(), SolError> {
        queries::packets::set_packet_kind(self.db()?, id, kind).await
    }

    async fn get_transmission(&self, id: &str) -> Result<Option<Transmission>, SolError> {
        queries::transmissions::get_transmission(self.db()?, id).await
    }

    async fn transmissions_by_status(
        &self,
        status: TransmissionStatus,
    ) -> Result<Vec<Transmission>, SolError> {
        queries::transmissions::transmissions_by_status(self.db()?, status).await
    }

    async fn mark_sending(&self, id: &str) -> Result<(), SolError> {
        queries::transmissions::mark_sending(self.db()?, id).await
    }

    async fn mark_succeeded(&self, id: &str) -> Result<(), SolError> {
        queries::transmissions::mark_succeeded(self.db()?, id).await
    }

    async fn mark_failed(&self, id: &str, error: &str) -> Result<(), SolError> {
        queries::transmissions::mark_failed(self.db()?, id, error).await
    }

    async fn requeue(&self, id: &str) -> Result<(), SolError> {
        queries::transmissions::requeue(self.db()?, id).await
    }

    // --- Delivery attempts ---

    async fn record_attempt(&self, attempt: &DeliveryAttempt) -> Result<(), SolError> {
        queries::transmissions::record_attempt(self.db()?, attempt).await
    }

    async fn attempts_for_transmission(
        &self,
        transmission_id: &str,
    ) -> Result<Vec<DeliveryAttempt>, SolError> {
        queries::transmissions::attempts_for_transmission(self.db()?, transmission_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_core::types::Sender;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn make_thread(id: &str) -> Thread {
        Thread {
            id: id.to_string(),
            title: "Store test".to_string(),
            last_active_at: "2026-01-01T00:00:00.000Z".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let store = SqliteStore::in_memory();
        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let store = SqliteStore::in_memory();
        assert!(store.get_thread("t1").await.is_err());
    }

    #[tokio::test]
    async fn full_outbound_lifecycle_through_store() {
        let store = SqliteStore::in_memory();
        store.initialize().await.unwrap();

        store.create_thread(&make_thread("t1")).await.unwrap();
        store
            .insert_message(&Message {
                id: "m1".to_string(),
                thread_id: "t1".to_string(),
                sender: Sender::User,
                text: "hello".to_string(),
                created_at: "2026-01-01T00:00:01.000Z".to_string(),
            })
            .await
            .unwrap();

        let packet = Packet {
            id: "p1".to_string(),
            kind: PacketKind::Chat,
            thread_id: "t1".to_string(),
            message_ids: vec!["m1".to_string()],
            context_json: None,
            payload_json: None,
            created_at: "2026-01-01T00:00:01.000Z".to_string(),
        };
        let transmission = Transmission {
            id: "tx1".to_string(),
            packet_id: "p1".to_string(),
            status: TransmissionStatus::Queued,
            last_error: None,
            created_at: "2026-01-01T00:00:01.000Z".to_string(),
        };
        store.create_outbound(&packet, &transmission).await.unwrap();

        let queued = store
            .transmissions_by_status(TransmissionStatus::Queued)
            .await
            .unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].id, "tx1");

        store.mark_sending("tx1").await.unwrap();
        store.mark_succeeded("tx1").await.unwrap();

        let t = store.get_transmission("tx1").await.unwrap().unwrap();
        assert_eq!(t.status, TransmissionStatus::Succeeded);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn store_survives_restart() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("durable.db");
        let path = db_path.to_str().unwrap();

        {
            let store = SqliteStore::new(make_config(path));
            store.initialize().await.unwrap();
            store.create_thread(&make_thread("t1")).await.unwrap();
            store.close().await.unwrap();
        }

        let store = SqliteStore::new(make_config(path));
        store.initialize().await.unwrap();
        let thread = store.get_thread("t1").await.unwrap();
        assert!(thread.is_some(), "thread should survive process restart");
    }
}
