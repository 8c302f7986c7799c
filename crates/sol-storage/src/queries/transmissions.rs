// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transmission lifecycle operations and the delivery-attempt audit trail.

use std::str::FromStr;

use rusqlite::params;
use sol_core::SolError;

use crate::database::Database;
use crate::models::{DeliveryAttempt, Packet, Transmission, TransmissionStatus};

fn row_to_transmission(row: &rusqlite::Row<'_>) -> Result<Transmission, rusqlite::Error> {
    let status: String = row.get(2)?;
    let status = TransmissionStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Transmission {
        id: row.get(0)?,
        packet_id: row.get(1)?,
        status,
        last_error: row.get(3)?,
        created_at: row.get(4)?,
    })
}

const TRANSMISSION_COLUMNS: &str = "id, packet_id, status, last_error, created_at";

/// Persist a packet and its transmission in a single transaction.
///
/// Enqueueing must be all-or-nothing: a packet without a transmission would
/// never be delivered, and a transmission without a packet cannot build an
/// envelope.
pub async fn create_outbound(
    db: &Database,
    packet: &Packet,
    transmission: &Transmission,
) -> Result<(), SolError> {
    let packet = packet.clone();
    let transmission = transmission.clone();
    db.connection()
        .call(move |conn| {
            let message_ids = serde_json::to_string(&packet.message_ids).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(e))
            })?;

            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO packets (id, kind, thread_id, message_ids, context_json, payload_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    packet.id,
                    packet.kind.to_string(),
                    packet.thread_id,
                    message_ids,
                    packet.context_json,
                    packet.payload_json,
                    packet.created_at,
                ],
            )?;
            tx.execute(
                "INSERT INTO transmissions (id, packet_id, status, last_error, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    transmission.id,
                    transmission.packet_id,
                    transmission.status.to_string(),
                    transmission.last_error,
                    transmission.created_at,
                ],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a transmission by ID.
pub async fn get_transmission(db: &Database, id: &str) -> Result<Option<Transmission>, SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRANSMISSION_COLUMNS} FROM transmissions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_transmission);
            match result {
                Ok(t) => Ok(Some(t)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transmissions in the given status, oldest first (FIFO order for the
/// queue-processing cycle).
pub async fn transmissions_by_status(
    db: &Database,
    status: TransmissionStatus,
) -> Result<Vec<Transmission>, SolError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRANSMISSION_COLUMNS} FROM transmissions
                 WHERE status = ?1
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![status.to_string()], row_to_transmission)?;
            let mut transmissions = Vec::new();
            for row in rows {
                transmissions.push(row?);
            }
            Ok(transmissions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Move a transmission to `sending` and clear its last error.
pub async fn mark_sending(db: &Database, id: &str) -> Result<(), SolError> {
    update_status(db, id, TransmissionStatus::Sending, None).await
}

/// Terminal success.
pub async fn mark_succeeded(db: &Database, id: &str) -> Result<(), SolError> {
    update_status(db, id, TransmissionStatus::Succeeded, None).await
}

/// Record a failed delivery attempt with a human-readable description.
pub async fn mark_failed(db: &Database, id: &str, error: &str) -> Result<(), SolError> {
    update_status(db, id, TransmissionStatus::Failed, Some(error.to_string())).await
}

/// Reset a failed transmission to `queued` and clear its last error.
pub async fn requeue(db: &Database, id: &str) -> Result<(), SolError> {
    update_status(db, id, TransmissionStatus::Queued, None).await
}

async fn update_status(
    db: &Database,
    id: &str,
    status: TransmissionStatus,
    last_error: Option<String>,
) -> Result<(), SolError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE transmissions SET status = ?1, last_error = ?2 WHERE id = ?3",
                params![status.to_string(), last_error, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Append one delivery attempt to the audit trail.
pub async fn record_attempt(db: &Database, attempt: &DeliveryAttempt) -> Result<(), SolError> {
    let attempt = attempt.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO delivery_attempts (id, transmission_id, started_at, outcome, detail)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    attempt.id,
                    attempt.transmission_id,
                    attempt.started_at,
                    attempt.outcome,
                    attempt.detail,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Attempts for a transmission in the order they happened.
pub async fn attempts_for_transmission(
    db: &Database,
    transmission_id: &str,
) -> Result<Vec<DeliveryAttempt>, SolError> {
    let transmission_id = transmission_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, transmission_id, started_at, outcome, detail
                 FROM delivery_attempts WHERE transmission_id = ?1
                 ORDER BY started_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![transmission_id], |row| {
                Ok(DeliveryAttempt {
                    id: row.get(0)?,
                    transmission_id: row.get(1)?,
                    started_at: row.get(2)?,
                    outcome: row.get(3)?,
                    detail: row.get(4)?,
                })
            })?;
            let mut attempts = Vec::new();
            for row in rows {
                attempts.push(row?);
            }
            Ok(attempts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
