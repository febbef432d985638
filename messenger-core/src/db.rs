use std::fs;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::config::StoreConfig;
use crate::error::StorageError;

const SCHEMA: &str = "
    -- Append-only message log. AUTOINCREMENT keeps ids from being reused after deletes.
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender TEXT NOT NULL,
        receiver TEXT NOT NULL,
        content TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );

    -- Both directions of a pair, and contact derivation from either column
    CREATE INDEX IF NOT EXISTS idx_messages_sender_receiver ON messages(sender, receiver);
    CREATE INDEX IF NOT EXISTS idx_messages_receiver_sender ON messages(receiver, sender);
";

/// Handle to the durable message log: one SQLite connection guarded by one mutex.
///
/// Construct it once at startup and share it (behind an `Arc`) with every
/// caller in the process.
pub struct Database(Mutex<Connection>);

impl Database {
    /// Open the database described by `config`, creating the file and its
    /// parent directory if needed. Does not create the schema; call
    /// [`Database::initialize`] for that.
    pub fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        if config.is_in_memory() {
            let db = Self::open_in_memory()?;
            db.lock()?.busy_timeout(config.busy_timeout)?;
            return Ok(db);
        }

        if let Some(dir) = config.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(&config.db_path)?;
        conn.busy_timeout(config.busy_timeout)?;

        // WAL lets readers in other processes proceed while a write commits
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::debug!(
            "Opened message database at {} (journal_mode={})",
            config.db_path.display(),
            journal_mode
        );

        Ok(Self(Mutex::new(conn)))
    }

    /// Private in-memory database, gone when the handle is dropped.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self(Mutex::new(conn)))
    }

    /// Create the `messages` table and its indexes if they are missing.
    /// Safe to call on every start; existing rows are left alone.
    pub fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("Message schema ready");
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.0.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Run `f` inside an immediate write transaction. Nothing `f` did is
    /// visible to other connections unless it returns `Ok`.
    pub(crate) fn write_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
