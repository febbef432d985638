use std::sync::Arc;

use messenger_core::ConversationIndex;
use messenger_server::{handle_message, ServerMessage, ServerState};

#[tokio::test]
async fn test_sender_comes_from_connection() {
    let state = Arc::new(ServerState::new(ConversationIndex::in_memory().unwrap()));

    // Extra "sender" field is ignored; the message is stored as the connected user
    let spoofed_json = r#"{
        "type": "send_message",
        "sender": "admin",
        "receiver": "victim",
        "content": "Click this link"
    }"#;

    match handle_message(spoofed_json, "attacker", &state).await {
        ServerMessage::MessageStored { message } => {
            assert_eq!(message.sender, "attacker");
        }
        other => panic!("Expected MessageStored, got {:?}", other),
    }

    let contacts = state.index().list_contacts("victim").unwrap();
    assert_eq!(contacts, vec!["attacker"]);
    assert!(state.index().list_contacts("admin").unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_limited_to_own_conversations() {
    let state = Arc::new(ServerState::new(ConversationIndex::in_memory().unwrap()));
    state.index().append("alice", "bob", "private").unwrap();

    // mallory can only name a contact; the other side is always mallory
    let response = handle_message(
        r#"{"type":"delete_conversation","contact":"bob"}"#,
        "mallory",
        &state,
    )
    .await;

    match response {
        ServerMessage::ConversationDeleted { deleted, .. } => assert_eq!(deleted, 0),
        other => panic!("Expected ConversationDeleted, got {:?}", other),
    }
    assert_eq!(state.index().open_thread("alice", "bob").unwrap().len(), 1);
}
