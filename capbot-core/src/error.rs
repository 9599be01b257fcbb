//! Error types for the bot core.
//!
//! [`BotError`] is the single error taxonomy shared by every crate. Storage and
//! Telegram transport errors convert into it in their own crates.

use thiserror::Error;

/// Top-level error for capbot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Malformed user input: missing separator, empty fields, bad index or chat id.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced replacement index or channel link does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The Telegram API was unreachable or answered with a non-ok envelope.
    #[error("Remote call error: {0}")]
    Remote(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for errors caused by user input; these are answered in chat, not logged as failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// Text to show the user for a user-facing error, without the variant label.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) => Some(msg),
            _ => None,
        }
    }

    /// True for failures of an external collaborator (Telegram API or KV store).
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Storage(_))
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(BotError::validation("x").is_user_facing());
        assert!(BotError::not_found("x").is_user_facing());
        assert!(!BotError::Remote("down".into()).is_user_facing());
        assert!(BotError::Remote("down".into()).is_external());
        assert!(BotError::Storage("locked".into()).is_external());
        assert!(!BotError::Config("bad".into()).is_external());
        assert_eq!(BotError::validation("missing |").user_message(), Some("missing |"));
        assert_eq!(BotError::Storage("locked".into()).user_message(), None);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            BotError::validation("missing |").to_string(),
            "Validation error: missing |"
        );
        assert_eq!(
            BotError::not_found("replacement #4").to_string(),
            "Not found: replacement #4"
        );
    }
}
