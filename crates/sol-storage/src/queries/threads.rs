// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread CRUD operations.

use rusqlite::params;
use sol_core::SolError;

use crate::database::Database;
use crate::models::Thread;

fn row_to_thread(row: &rusqlite::Row<'_>) -> Result<Thread, rusqlite::Error> {
    Ok(Thread {
        id: row.get(0)?,
        title: row.get(1)?,
        last_active_at: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Insert a new thread.
pub async fn create_thread(db: &Database, thread: &Thread) -> Result<(), SolError> {
    let thread = thread.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO threads (id, title, last_active_at, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![thread.id, thread.title, thread.last_active_at, thread.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a thread by ID.
pub async fn get_thread(db: &Database, id: &str) -> Result<Option<Thread>, SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, last_active_at, created_at FROM threads WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_thread);
            match result {
                Ok(thread) => Ok(Some(thread)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all threads, most recently active first.
pub async fn list_threads(db: &Database) -> Result<Vec<Thread>, SolError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, last_active_at, created_at FROM threads
                 ORDER BY last_active_at DESC",
            )?;
            let rows = stmt.query_map([], row_to_thread)?;
            let mut threads = Vec::new();
            for row in rows {
                threads.push(row?);
            }
            Ok(threads)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a thread's last-active timestamp.
pub async fn touch_thread(db: &Database, id: &str, last_active_at: &str) -> Result<(), SolError> {
    let id = id.to_string();
    let last_active_at = last_active_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE threads SET last_active_at = ?1 WHERE id = ?2",
                params![last_active_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn make_thread(id: &str) -> Thread {
        Thread {
            id: id.to_string(),
            title: "Test thread".to_string(),
            last_active_at: "2026-01-01T00:00:00.000Z".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_thread_roundtrips() {
        let db = setup_db().await;
        let thread = make_thread("t1");

        create_thread(&db, &thread).await.unwrap();
        let retrieved = get_thread(&db, "t1").await.unwrap().unwrap();
        assert_eq!(retrieved, thread);
    }

    #[tokio::test]
    async fn get_nonexistent_thread_returns_none() {
        let db = setup_db().await;
        assert!(get_thread(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_updates_last_active() {
        let db = setup_db().await;
        create_thread(&db, &make_thread("t1")).await.unwrap();

        touch_thread(&db, "t1", "2026-02-01T12:00:00.000Z").await.unwrap();

        let retrieved = get_thread(&db, "t1").await.unwrap().unwrap();
        assert_eq!(retrieved.last_active_at, "2026-02-01T12:00:00.000Z");
        assert_eq!(retrieved.created_at, "2026-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn list_orders_by_recent_activity() {
        let db = setup_db().await;
        let mut t1 = make_thread("t1");
        t1.last_active_at = "2026-01-01T00:00:00.000Z".to_string();
        let mut t2 = make_thread("t2");
        t2.last_active_at = "2026-01-02T00:00:00.000Z".to_string();

        create_thread(&db, &t1).await.unwrap();
        create_thread(&db, &t2).await.unwrap();

        let threads = list_threads(&db).await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, "t2");
        assert_eq!(threads[1].id, "t1");
    }
}
