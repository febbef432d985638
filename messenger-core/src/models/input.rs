//! Input DTOs with garde validation for store and index operations.

use garde::Validate;

use crate::error::ValidationError;
use crate::utils::validation::{validate_content, validate_identity};

/// A message about to be appended.
#[derive(Debug, Validate)]
#[garde(context(()))]
pub struct NewMessage {
    #[garde(custom(validate_identity))]
    pub sender: String,
    #[garde(custom(validate_identity))]
    pub receiver: String,
    #[garde(custom(validate_content))]
    pub content: String,
}

/// The two identities of a conversation.
#[derive(Debug, Validate)]
#[garde(context(()))]
pub struct ConversationPair {
    #[garde(custom(validate_identity))]
    pub user_a: String,
    #[garde(custom(validate_identity))]
    pub user_b: String,
}

/// Converts garde reports into the crate's validation error
pub trait ValidateExt {
    fn validate_input(&self) -> Result<(), ValidationError>;
}

impl<T: Validate<Context = ()>> ValidateExt for T {
    fn validate_input(&self) -> Result<(), ValidationError> {
        self.validate()
            .map_err(|report| ValidationError::InvalidInput(report.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_new_message() {
        let input = NewMessage {
            sender: "alice".to_string(),
            receiver: "bob".to_string(),
            content: "hi".to_string(),
        };
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn test_report_names_failing_field() {
        let input = NewMessage {
            sender: "alice".to_string(),
            receiver: String::new(),
            content: "hi".to_string(),
        };
        let err = input.validate_input().unwrap_err();
        assert!(err.to_string().contains("receiver"));
    }

    #[test]
    fn test_pair_rejects_blank_identity() {
        let input = ConversationPair {
            user_a: "   ".to_string(),
            user_b: "bob".to_string(),
        };
        assert!(input.validate_input().is_err());
    }
}
