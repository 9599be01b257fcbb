//! Inbound update routing over teloxide's update types, and [`ChatRef`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use teloxide::types::{CallbackQuery, ChatId, Message, PhotoSize, Recipient, Update, UpdateKind};

use crate::error::BotError;

/// Which dispatcher branch an update belongs to.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    ChannelPost(&'a Message),
    PrivateMessage(&'a Message),
    CallbackQuery(&'a CallbackQuery),
    /// Any other shape (group messages, edits, inline queries, ...). Acknowledged, no side effect.
    Other,
}

pub fn route(update: &Update) -> Route<'_> {
    match &update.kind {
        UpdateKind::ChannelPost(post) => Route::ChannelPost(post),
        UpdateKind::Message(msg) if msg.chat.is_private() => Route::PrivateMessage(msg),
        UpdateKind::CallbackQuery(query) => Route::CallbackQuery(query),
        _ => Route::Other,
    }
}

/// Media accessors the channel pipeline needs on top of teloxide's [`Message`].
pub trait MessageExt {
    fn has_media(&self) -> bool;

    /// Largest photo size, which is the one worth re-sending. Telegram lists sizes smallest first.
    fn largest_photo(&self) -> Option<&PhotoSize>;

    /// First photo size; used for fingerprinting so the result does not depend on which sizes were generated.
    fn first_photo(&self) -> Option<&PhotoSize>;

    /// Sender id, falling back to the chat id for anonymous senders.
    fn sender_id(&self) -> i64;
}

impl MessageExt for Message {
    fn has_media(&self) -> bool {
        self.photo().is_some_and(|p| !p.is_empty())
            || self.video().is_some()
            || self.document().is_some()
    }

    fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo().and_then(|p| p.last())
    }

    fn first_photo(&self) -> Option<&PhotoSize> {
        self.photo().and_then(|p| p.first())
    }

    fn sender_id(&self) -> i64 {
        self.from.as_ref().map_or(self.chat.id.0, |u| u.id.0 as i64)
    }
}

/// A chat identifier as the Bot API accepts it: numeric id or `@username`.
///
/// Serializes as a JSON number or string, the shape stored in channel configs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRef {
    Id(i64),
    Username(String),
}

impl ChatRef {
    /// The name without the leading `@`, for username references.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Username(name) => Some(name.trim_start_matches('@')),
        }
    }

    pub fn recipient(&self) -> Recipient {
        match self {
            Self::Id(id) => Recipient::Id(ChatId(*id)),
            Self::Username(name) => Recipient::ChannelUsername(name.clone()),
        }
    }
}

impl From<i64> for ChatRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl FromStr for ChatRef {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if let Some(name) = s.strip_prefix('@') {
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if valid {
                return Ok(Self::Username(format!("@{}", name)));
            }
        }
        Err(BotError::validation(format!(
            "'{}' is not a chat id or @username",
            s
        )))
    }
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Username(name) => write!(f, "{}", name),
        }
    }
}
