//! # Message Store
//!
//! Durable, ordered persistence of the message log. Every other view of the
//! data (contacts, threads) is a query over this one table.
//!
//! Ordering within a conversation is by `id`, which SQLite assigns and never
//! reuses. Timestamps are informational.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use rusqlite::{params, Connection};

use crate::db::Database;
use crate::error::{Result, StorageError};
use crate::models::input::{NewMessage, ValidateExt};
use crate::models::Message;
use crate::utils::{format_timestamp, parse_timestamp};

const SELECT_BETWEEN: &str = "
    SELECT id, sender, receiver, content, timestamp
    FROM messages
    WHERE (sender = ?1 AND receiver = ?2) OR (sender = ?2 AND receiver = ?1)
    ORDER BY id ASC";

const SELECT_CONTACTS: &str = "
    SELECT DISTINCT CASE WHEN sender = ?1 THEN receiver ELSE sender END AS contact
    FROM messages
    WHERE sender = ?1 OR receiver = ?1";

const DELETE_BETWEEN: &str = "
    DELETE FROM messages
    WHERE (sender = ?1 AND receiver = ?2) OR (sender = ?2 AND receiver = ?1)";

/// Row as stored, before the timestamp text is parsed.
struct StoredRow {
    id: i64,
    sender: String,
    receiver: String,
    content: String,
    timestamp: String,
}

impl StoredRow {
    fn into_message(self) -> std::result::Result<Message, StorageError> {
        let timestamp =
            parse_timestamp(&self.timestamp).map_err(|_| StorageError::CorruptTimestamp {
                id: self.id,
                value: self.timestamp.clone(),
            })?;
        Ok(Message {
            id: self.id,
            sender: self.sender,
            receiver: self.receiver,
            content: self.content,
            timestamp,
        })
    }
}

fn query_between(
    conn: &Connection,
    user_a: &str,
    user_b: &str,
) -> std::result::Result<Vec<Message>, StorageError> {
    let mut stmt = conn.prepare_cached(SELECT_BETWEEN)?;
    let rows = stmt
        .query_map(params![user_a, user_b], |row| {
            Ok(StoredRow {
                id: row.get(0)?,
                sender: row.get(1)?,
                receiver: row.get(2)?,
                content: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(StoredRow::into_message).collect()
}

/// Query and mutation surface over the `messages` table.
#[derive(Clone)]
pub struct MessageStore {
    db: Arc<Database>,
}

impl MessageStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Ensure the schema exists. Idempotent.
    pub fn initialize(&self) -> Result<()> {
        self.db.initialize()?;
        Ok(())
    }

    /// Validate and persist one message, returning it with the id and UTC
    /// timestamp the store assigned. The row is committed before this returns.
    pub fn append(&self, sender: &str, receiver: &str, content: &str) -> Result<Message> {
        let input = NewMessage {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            content: content.to_string(),
        };
        input.validate_input()?;

        let conn = self.db.lock()?;
        // Taken under the lock so timestamps never run backwards relative to ids.
        // Truncated to the stored precision so the returned value equals what a read sees.
        let timestamp = Utc::now().trunc_subsecs(6);
        conn.execute(
            "INSERT INTO messages (sender, receiver, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                &input.sender,
                &input.receiver,
                &input.content,
                format_timestamp(timestamp)
            ],
        )
        .map_err(StorageError::from)?;
        let id = conn.last_insert_rowid();
        drop(conn);

        tracing::info!("Stored message {} from {} to {}", id, input.sender, input.receiver);

        Ok(Message {
            id,
            sender: input.sender,
            receiver: input.receiver,
            content: input.content,
            timestamp,
        })
    }

    /// All messages exchanged between the two users in either direction,
    /// oldest first. Symmetric in its arguments.
    pub fn fetch_between(&self, user_a: &str, user_b: &str) -> Result<Vec<Message>> {
        let conn = self.db.lock()?;
        let messages = query_between(&conn, user_a, user_b)?;
        tracing::debug!(
            "Fetched {} messages between {} and {}",
            messages.len(),
            user_a,
            user_b
        );
        Ok(messages)
    }

    /// Every identity that appears opposite `user` in at least one message.
    pub fn fetch_contacts(&self, user: &str) -> Result<HashSet<String>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare_cached(SELECT_CONTACTS).map_err(StorageError::from)?;
        let contacts = stmt
            .query_map([user], |row| row.get::<_, String>(0))
            .map_err(StorageError::from)?
            .collect::<std::result::Result<HashSet<_>, _>>()
            .map_err(StorageError::from)?;
        tracing::debug!("Found {} contacts for {}", contacts.len(), user);
        Ok(contacts)
    }

    /// Remove the whole conversation between the two users in one
    /// transaction and return how many messages went with it.
    pub fn delete_between(&self, user_a: &str, user_b: &str) -> Result<usize> {
        let deleted = self
            .db
            .write_transaction(|tx| Ok(tx.execute(DELETE_BETWEEN, params![user_a, user_b])?))?;
        tracing::info!(
            "Deleted {} messages between {} and {}",
            deleted,
            user_a,
            user_b
        );
        Ok(deleted)
    }
}
