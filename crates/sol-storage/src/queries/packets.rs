// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Packet read/update operations.
//!
//! Packets are only ever created together with their transmission; see
//! `queries::transmissions::create_outbound`.

use std::str::FromStr;

use rusqlite::params;
use sol_core::SolError;

use crate::database::Database;
use crate::models::{Packet, PacketKind};

pub(crate) fn row_to_packet(row: &rusqlite::Row<'_>) -> Result<Packet, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let kind = PacketKind::from_str(&kind).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let message_ids: String = row.get(3)?;
    let message_ids: Vec<String> = serde_json::from_str(&message_ids).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Packet {
        id: row.get(0)?,
        kind,
        thread_id: row.get(2)?,
        message_ids,
        context_json: row.get(4)?,
        payload_json: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub(crate) const PACKET_COLUMNS: &str =
    "id, kind, thread_id, message_ids, context_json, payload_json, created_at";

/// Get a packet by ID.
pub async fn get_packet(db: &Database, id: &str) -> Result<Option<Packet>, SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PACKET_COLUMNS} FROM packets WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_packet);
            match result {
                Ok(packet) => Ok(Some(packet)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rewrite a packet's kind. Only used for the one-shot debug-fail flip on
/// manual retry.
pub async fn set_packet_kind(db: &Database, id: &str, kind: PacketKind) -> Result<(), SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE packets SET kind = ?1 WHERE id = ?2",
                params![kind.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
