use messenger_core::{ConversationIndex, Error};
use tracing::{debug, error};

use crate::messages::{ClientMessage, ErrorKind, ServerMessage};

/// Shared by every connection: the one handle to the message store.
pub struct ServerState {
    index: ConversationIndex,
}

impl ServerState {
    pub fn new(index: ConversationIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &ConversationIndex {
        &self.index
    }

    /// Run one request on behalf of `user_id`. Blocks on the database.
    pub fn handle_request(&self, user_id: &str, request: ClientMessage) -> ServerMessage {
        let result = match request {
            ClientMessage::Connect { .. } => {
                return ServerMessage::error(ErrorKind::Protocol, "Already connected");
            }
            ClientMessage::ListContacts => self
                .index
                .list_contacts(user_id)
                .map(|contacts| ServerMessage::Contacts { contacts }),
            ClientMessage::OpenThread { contact } => self
                .index
                .open_thread(user_id, &contact)
                .map(|messages| ServerMessage::Thread { contact, messages }),
            ClientMessage::SendMessage { receiver, content } => self
                .index
                .append(user_id, &receiver, &content)
                .map(|message| ServerMessage::MessageStored { message }),
            ClientMessage::StartConversation { contact } => self
                .index
                .start_conversation(user_id, &contact)
                .map(|()| ServerMessage::ConversationStarted { contact }),
            ClientMessage::DeleteConversation { contact } => self
                .index
                .delete_conversation(user_id, &contact)
                .map(|deleted| ServerMessage::ConversationDeleted { contact, deleted }),
            ClientMessage::ConversationSummary { contact } => self
                .index
                .conversation_summary(user_id, &contact)
                .map(|summary| ServerMessage::Summary { summary }),
        };

        result.unwrap_or_else(|e| error_response(user_id, e))
    }
}

fn error_response(user_id: &str, err: Error) -> ServerMessage {
    match err {
        Error::Validation(e) => {
            debug!("Rejected request from {}: {}", user_id, e);
            ServerMessage::error(ErrorKind::Validation, e.to_string())
        }
        Error::Storage(e) => {
            error!("Storage failure serving {}: {}", user_id, e);
            ServerMessage::error(ErrorKind::Storage, e.to_string())
        }
        Error::Config(msg) => {
            error!("Configuration error serving {}: {}", user_id, msg);
            ServerMessage::error(ErrorKind::Internal, msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ServerState {
        ServerState::new(ConversationIndex::in_memory().unwrap())
    }

    fn send(state: &ServerState, from: &str, to: &str, content: &str) -> ServerMessage {
        state.handle_request(
            from,
            ClientMessage::SendMessage {
                receiver: to.to_string(),
                content: content.to_string(),
            },
        )
    }

    #[test]
    fn test_send_message_stores_as_connected_user() {
        let state = state();

        match send(&state, "alice", "bob", "hi") {
            ServerMessage::MessageStored { message } => {
                assert_eq!(message.id, 1);
                assert_eq!(message.sender, "alice");
                assert_eq!(message.receiver, "bob");
            }
            other => panic!("Expected MessageStored, got {:?}", other),
        }
    }

    #[test]
    fn test_list_contacts_and_thread() {
        let state = state();
        send(&state, "alice", "bob", "hi");
        send(&state, "carol", "alice", "hey");

        match state.handle_request("alice", ClientMessage::ListContacts) {
            ServerMessage::Contacts { contacts } => assert_eq!(contacts, vec!["bob", "carol"]),
            other => panic!("Expected Contacts, got {:?}", other),
        }

        match state.handle_request(
            "bob",
            ClientMessage::OpenThread {
                contact: "alice".to_string(),
            },
        ) {
            ServerMessage::Thread { contact, messages } => {
                assert_eq!(contact, "alice");
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].content, "hi");
            }
            other => panic!("Expected Thread, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let state = state();

        match send(&state, "alice", "bob", "   ") {
            ServerMessage::Error { kind, .. } => assert_eq!(kind, ErrorKind::Validation),
            other => panic!("Expected Error, got {:?}", other),
        }

        match state.handle_request(
            "alice",
            ClientMessage::StartConversation {
                contact: "alice".to_string(),
            },
        ) {
            ServerMessage::Error { kind, message } => {
                assert_eq!(kind, ErrorKind::Validation);
                assert!(message.contains("yourself"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_start_summary_delete() {
        let state = state();

        assert!(matches!(
            state.handle_request(
                "alice",
                ClientMessage::StartConversation {
                    contact: "bob".to_string()
                }
            ),
            ServerMessage::ConversationStarted { .. }
        ));

        match state.handle_request(
            "alice",
            ClientMessage::ConversationSummary {
                contact: "bob".to_string(),
            },
        ) {
            ServerMessage::Summary { summary } => {
                assert_eq!(summary.message_count, 1);
                assert!(summary.last_message_at.is_some());
            }
            other => panic!("Expected Summary, got {:?}", other),
        }

        match state.handle_request(
            "bob",
            ClientMessage::DeleteConversation {
                contact: "alice".to_string(),
            },
        ) {
            ServerMessage::ConversationDeleted { deleted, .. } => assert_eq!(deleted, 1),
            other => panic!("Expected ConversationDeleted, got {:?}", other),
        }

        assert!(state.index().list_contacts("alice").unwrap().is_empty());
    }

    #[test]
    fn test_second_connect_is_protocol_error() {
        let state = state();
        match state.handle_request(
            "alice",
            ClientMessage::Connect {
                user_id: "bob".to_string(),
            },
        ) {
            ServerMessage::Error { kind, .. } => assert_eq!(kind, ErrorKind::Protocol),
            other => panic!("Expected Error, got {:?}", other),
        }
    }
}
