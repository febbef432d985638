use messenger_core::{ConversationSummary, Message};
use serde::{Deserialize, Serialize};

/// Requests a client sends. Everything after `connect` acts as the
/// connected user; no request can name a different sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "connect")]
    Connect { user_id: String },
    #[serde(rename = "list_contacts")]
    ListContacts,
    #[serde(rename = "open_thread")]
    OpenThread { contact: String },
    #[serde(rename = "send_message")]
    SendMessage { receiver: String, content: String },
    #[serde(rename = "start_conversation")]
    StartConversation { contact: String },
    #[serde(rename = "delete_conversation")]
    DeleteConversation { contact: String },
    #[serde(rename = "conversation_summary")]
    ConversationSummary { contact: String },
}

/// Responses, exactly one per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "connected")]
    Connected { user_id: String },
    #[serde(rename = "contacts")]
    Contacts { contacts: Vec<String> },
    #[serde(rename = "thread")]
    Thread {
        contact: String,
        messages: Vec<Message>,
    },
    #[serde(rename = "message_stored")]
    MessageStored { message: Message },
    #[serde(rename = "conversation_started")]
    ConversationStarted { contact: String },
    #[serde(rename = "conversation_deleted")]
    ConversationDeleted { contact: String, deleted: usize },
    #[serde(rename = "summary")]
    Summary { summary: ConversationSummary },
    #[serde(rename = "error")]
    Error { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input; the client can correct it and retry
    Validation,
    /// Database failure; the operation did not happen
    Storage,
    /// Unparseable or out-of-place frame
    Protocol,
    Internal,
}

impl ServerMessage {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            kind,
            message: message.into(),
        }
    }
}
