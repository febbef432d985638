//! Typed outcomes for every store and index operation.
//!
//! Callers get one of two failure classes: a `ValidationError`, which they
//! can fix by correcting their input, or a `StorageError`, which is fatal for
//! that operation. Nothing here retries.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(StorageError::Sqlite(err))
    }
}

/// Rejected input. Never leaves persisted state changed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot start a conversation with yourself ({0})")]
    SelfConversation(String),
}

/// Failure of the underlying SQLite database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("Message {id} has a corrupt timestamp: {value:?}")]
    CorruptTimestamp { id: i64, value: String },
}
