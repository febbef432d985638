//! Two-party message store.
//!
//! Users exchange text messages addressed by sender/receiver username. The
//! [`MessageStore`] owns the append-only `messages` table in SQLite; the
//! [`ConversationIndex`] derives contact lists and threads from it on every
//! call. There is no cache and no second copy of the data.

pub mod config;
pub mod conversations;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use config::StoreConfig;
pub use conversations::ConversationIndex;
pub use db::Database;
pub use error::{Error, Result, StorageError, ValidationError};
pub use models::{ConversationSummary, Message, CONVERSATION_START_MARKER};
pub use store::MessageStore;
