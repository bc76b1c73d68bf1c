// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue operations for crash-safe background sync jobs.
//!
//! Lifecycle: pending -> processing (with a lock timeout) -> completed, or
//! back to pending on failure until `max_attempts` is exhausted, then failed.
//! Execution is at-least-once: a job whose worker dies mid-run is re-picked
//! once its lock expires.

use merchsync_core::MerchsyncError;
use merchsync_core::types::QueueEntry;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const ENTRY_COLUMNS: &str = "id, queue_name, payload, status, attempts, max_attempts,
                             created_at, updated_at, locked_until";

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<QueueEntry, rusqlite::Error> {
    Ok(QueueEntry {
        id: row.get(0)?,
        queue_name: row.get(1)?,
        payload: row.get(2)?,
        status: row.get(3)?,
        attempts: row.get(4)?,
        max_attempts: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        locked_until: row.get(8)?,
    })
}

/// Enqueue a new item. Returns the auto-generated queue entry ID.
pub async fn enqueue(
    db: &Database,
    queue_name: &str,
    payload: &str,
) -> Result<i64, MerchsyncError> {
    let queue_name = queue_name.to_string();
    let payload = payload.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queue (queue_name, payload) VALUES (?1, ?2)",
                params![queue_name, payload],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Dequeue the next runnable entry from the named queue.
///
/// Atomically selects the oldest pending entry (or a processing entry whose
/// lock has expired) and marks it as "processing" with a 5-minute lock.
/// Returns `None` if nothing is runnable.
pub async fn dequeue(
    db: &Database,
    queue_name: &str,
) -> Result<Option<QueueEntry>, MerchsyncError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let result = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS}
                     FROM queue
                     WHERE queue_name = ?1
                       AND (status = 'pending'
                            OR (status = 'processing'
                                AND locked_until < strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))
                     ORDER BY id ASC
                     LIMIT 1"
                ))?;
                stmt.query_row(params![queue_name], row_to_entry)
            };

            match result {
                Ok(entry) => {
                    tx.execute(
                        "UPDATE queue SET status = 'processing',
                         locked_until = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '+5 minutes'),
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?1",
                        params![entry.id],
                    )?;
                    tx.commit()?;

                    Ok(Some(QueueEntry {
                        status: "processing".to_string(),
                        ..entry
                    }))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    tx.commit()?;
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Acknowledge successful processing: marks the entry "completed".
pub async fn ack(db: &Database, id: i64) -> Result<(), MerchsyncError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE queue SET status = 'completed', locked_until = NULL,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a queue entry as failed.
///
/// Increments attempts; the entry goes back to "pending" for retry, or to
/// "failed" once attempts reach `max_attempts`. The lock is cleared either way.
pub async fn fail(db: &Database, id: i64) -> Result<(), MerchsyncError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE queue SET
                     attempts = attempts + 1,
                     status = CASE WHEN attempts + 1 >= max_attempts
                              THEN 'failed' ELSE 'pending' END,
                     locked_until = NULL,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Count entries in the named queue with the given status.
pub async fn count_with_status(
    db: &Database,
    queue_name: &str,
    status: &str,
) -> Result<i64, MerchsyncError> {
    let queue_name = queue_name.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM queue WHERE queue_name = ?1 AND status = ?2",
                params![queue_name, status],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}
