//! # Conversation Index
//!
//! User-facing view of the message log: sorted contact lists, threads,
//! and conversation start/delete. Holds no state of its own; every answer
//! is recomputed from the store.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::{Result, ValidationError};
use crate::models::input::{ConversationPair, ValidateExt};
use crate::models::{ConversationSummary, Message, CONVERSATION_START_MARKER};
use crate::store::MessageStore;

#[derive(Clone)]
pub struct ConversationIndex {
    store: MessageStore,
}

impl ConversationIndex {
    pub fn new(store: MessageStore) -> Self {
        Self { store }
    }

    /// Open the configured database and make sure its schema exists.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = Database::open(config)?;
        let index = Self::new(MessageStore::new(Arc::new(db)));
        index.initialize()?;
        Ok(index)
    }

    /// Fresh, initialized in-memory index.
    pub fn in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn initialize(&self) -> Result<()> {
        self.store.initialize()
    }

    pub fn append(&self, sender: &str, receiver: &str, content: &str) -> Result<Message> {
        self.store.append(sender, receiver, content)
    }

    /// Contacts of `user`, sorted ascending.
    pub fn list_contacts(&self, user: &str) -> Result<Vec<String>> {
        let mut contacts: Vec<String> = self.store.fetch_contacts(user)?.into_iter().collect();
        contacts.sort();
        Ok(contacts)
    }

    /// The conversation between two users, oldest message first.
    pub fn open_thread(&self, user_a: &str, user_b: &str) -> Result<Vec<Message>> {
        self.store.fetch_between(user_a, user_b)
    }

    /// Make `user_b` show up in `user_a`'s contacts (and vice versa) by
    /// writing a start marker. Contacts only exist where messages do, so an
    /// empty conversation needs one.
    pub fn start_conversation(&self, user_a: &str, user_b: &str) -> Result<()> {
        ConversationPair {
            user_a: user_a.to_string(),
            user_b: user_b.to_string(),
        }
        .validate_input()?;

        if user_a == user_b {
            tracing::warn!("Rejected conversation of {} with themselves", user_a);
            return Err(ValidationError::SelfConversation(user_a.to_string()).into());
        }

        let marker = self.store.append(user_a, user_b, CONVERSATION_START_MARKER)?;
        tracing::info!(
            "{} started a conversation with {} (marker {})",
            user_a,
            user_b,
            marker.id
        );
        Ok(())
    }

    /// Delete every message between the two users. Afterwards neither
    /// appears in the other's contact list.
    pub fn delete_conversation(&self, user_a: &str, user_b: &str) -> Result<usize> {
        self.store.delete_between(user_a, user_b)
    }

    /// Message count and time of the latest message between `user` and `contact`.
    pub fn conversation_summary(&self, user: &str, contact: &str) -> Result<ConversationSummary> {
        let thread = self.open_thread(user, contact)?;
        Ok(ConversationSummary {
            user: user.to_string(),
            contact: contact.to_string(),
            message_count: thread.len(),
            last_message_at: thread.last().map(|m| m.timestamp),
        })
    }
}
