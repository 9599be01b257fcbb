//! The outbound Bot API surface used by the handlers.
//!
//! [`BotApi`] is transport-agnostic: [`HttpBotApi`](crate::HttpBotApi) implements it over
//! teloxide and tests substitute a recording mock. Every text and caption is sent as HTML.

use async_trait::async_trait;
use teloxide::types::{
    CallbackQuery, ChatId, ChatMember, FileId, InlineKeyboardMarkup, MessageId, Recipient, UserId,
};

use crate::error::ApiError;

/// Which `send<Media>` method a re-send maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    pub fn method(self) -> &'static str {
        match self {
            Self::Photo => "sendPhoto",
            Self::Video => "sendVideo",
            Self::Document => "sendDocument",
        }
    }
}

/// The fixed set of Bot API methods the bot calls.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// HTML message, optionally with an inline keyboard. Returns the new message id.
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, ApiError>;

    /// Re-sends an uploaded file by id through `sendPhoto`, `sendVideo` or `sendDocument`.
    async fn send_media(
        &self,
        chat_id: Recipient,
        kind: MediaKind,
        file_id: FileId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError>;

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), ApiError>;

    async fn edit_message_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: &str,
    ) -> Result<(), ApiError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), ApiError>;

    async fn copy_message(
        &self,
        chat_id: Recipient,
        from_chat_id: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError>;

    /// Acknowledges a button press without showing a notification.
    async fn answer_callback_query(&self, query: &CallbackQuery) -> Result<(), ApiError>;

    async fn get_chat_member(
        &self,
        chat_id: Recipient,
        user_id: UserId,
    ) -> Result<ChatMember, ApiError>;

    /// Creates an invite link and returns its URL.
    async fn create_chat_invite_link(&self, chat_id: Recipient) -> Result<String, ApiError>;
}
