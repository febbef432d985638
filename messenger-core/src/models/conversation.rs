use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Details of one conversation as seen by `user`, derived from the thread.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub user: String,
    pub contact: String,
    pub message_count: usize,
    pub last_message_at: Option<DateTime<Utc>>,
}
