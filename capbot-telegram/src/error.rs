//! Telegram API call errors, classified from teloxide's [`RequestError`].

use capbot_core::BotError;
use teloxide::RequestError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Request never produced a response (DNS, connect, timeout).
    #[error("Transport error calling {method}: {message}")]
    Transport { method: String, message: String },

    /// Response body was not a Bot API envelope, or `result` had an unexpected shape.
    #[error("Failed to decode {method} response: {message}")]
    Decode { method: String, message: String },

    /// Telegram refused an edit that would leave the message unchanged.
    #[error("Telegram API error in {method}: message is not modified")]
    NotModified { method: String },

    /// Envelope with `ok: false`, flood control or chat migration.
    #[error("Telegram API error in {method}: {description}")]
    Telegram { method: String, description: String },
}

impl ApiError {
    pub fn from_request(method: &str, err: &RequestError) -> Self {
        let method = method.to_string();
        match err {
            RequestError::Api(teloxide::ApiError::MessageNotModified) => Self::NotModified { method },
            RequestError::Api(api_err) => Self::Telegram {
                method,
                description: api_err.to_string(),
            },
            RequestError::RetryAfter(_) | RequestError::MigrateToChatId(_) => Self::Telegram {
                method,
                description: err.to_string(),
            },
            RequestError::Network(_) | RequestError::Io(_) => Self::Transport {
                method,
                message: err.to_string(),
            },
            RequestError::InvalidJson { raw, .. } => Self::Decode {
                method,
                message: format!("invalid JSON response: {}", raw),
            },
        }
    }

    pub fn method(&self) -> &str {
        match self {
            Self::Transport { method, .. }
            | Self::Decode { method, .. }
            | Self::NotModified { method }
            | Self::Telegram { method, .. } => method,
        }
    }

    pub fn is_not_modified(&self) -> bool {
        match self {
            Self::NotModified { .. } => true,
            Self::Telegram { description, .. } => description.contains("message is not modified"),
            _ => false,
        }
    }
}

impl From<ApiError> for BotError {
    fn from(e: ApiError) -> Self {
        BotError::Remote(e.to_string())
    }
}
