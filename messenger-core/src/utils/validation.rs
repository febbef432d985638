//! Field rules used by the garde DTOs in `models/input.rs`.

/// Maximum lengths, in characters
pub const MAX_IDENTITY_LENGTH: usize = 128;
pub const MAX_CONTENT_LENGTH: usize = 10000;

/// Validate a username. Any non-blank string without control characters is
/// an identity; nothing checks that the user exists.
pub fn validate_identity(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("username cannot be empty"));
    }
    if value.chars().count() > MAX_IDENTITY_LENGTH {
        return Err(garde::Error::new(format!(
            "username too long (max {} characters)",
            MAX_IDENTITY_LENGTH
        )));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(garde::Error::new("username contains invalid characters"));
    }
    Ok(())
}

/// Validate message content. Stored verbatim, so newlines and markup are allowed.
pub fn validate_content(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("message cannot be empty"));
    }
    if value.chars().count() > MAX_CONTENT_LENGTH {
        return Err(garde::Error::new(format!(
            "message too long (max {} characters)",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}
