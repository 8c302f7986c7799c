// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use std::str::FromStr;

use rusqlite::params;
use sol_core::SolError;

use crate::database::Database;
use crate::models::{Message, Sender};

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<Message, rusqlite::Error> {
    let sender: String = row.get(2)?;
    let sender = Sender::from_str(&sender).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Message {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        sender,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a new message.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), SolError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, thread_id, sender, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    msg.id,
                    msg.thread_id,
                    msg.sender.to_string(),
                    msg.text,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a message by ID.
pub async fn get_message(db: &Database, id: &str) -> Result<Option<Message>, SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, thread_id, sender, content, created_at
                 FROM messages WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_message);
            match result {
                Ok(msg) => Ok(Some(msg)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get messages for a thread in chronological order.
pub async fn get_messages_for_thread(
    db: &Database,
    thread_id: &str,
) -> Result<Vec<Message>, SolError> {
    let thread_id = thread_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, thread_id, sender, content, created_at
                 FROM messages WHERE thread_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![thread_id], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
