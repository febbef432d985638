mod conversation;
pub mod input;
mod message;

pub use conversation::ConversationSummary;
pub use message::{Message, CONVERSATION_START_MARKER};
