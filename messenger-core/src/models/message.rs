use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content written when a user opens a chat before saying anything, so the
/// other party shows up in their contact list.
pub const CONVERSATION_START_MARKER: &str = "[Started conversation]";

/// One immutable entry of the message log.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// The party on the other side of this message from `user`'s point of
    /// view, or `None` if `user` is neither sender nor receiver.
    pub fn counterpart(&self, user: &str) -> Option<&str> {
        if self.sender == user {
            Some(self.receiver.as_str())
        } else if self.receiver == user {
            Some(self.sender.as_str())
        } else {
            None
        }
    }

    pub fn is_conversation_marker(&self) -> bool {
        self.content == CONVERSATION_START_MARKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(sender: &str, receiver: &str, content: &str) -> Message {
        Message {
            id: 7,
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_counterpart() {
        let msg = message("alice", "bob", "hi");
        assert_eq!(msg.counterpart("alice"), Some("bob"));
        assert_eq!(msg.counterpart("bob"), Some("alice"));
        assert_eq!(msg.counterpart("carol"), None);
    }

    #[test]
    fn test_marker_detection() {
        assert!(message("alice", "bob", CONVERSATION_START_MARKER).is_conversation_marker());
        assert!(!message("alice", "bob", "hello").is_conversation_marker());
    }

    #[test]
    fn test_serializes_timestamp_as_iso8601() {
        let json = serde_json::to_string(&message("alice", "bob", "hi")).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"sender\":\"alice\""));
        assert!(json.contains("\"timestamp\":\"2024-05-01T12:30:00Z\""));
    }
}
