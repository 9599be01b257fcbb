//! [`BotApi`] over [`teloxide::Bot`].
//!
//! Thin wrapper: each trait method is one teloxide request with HTML parse mode where text
//! is involved. Failures are classified into [`ApiError`].

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, ChatMember, FileId, InlineKeyboardMarkup, InputFile, MessageId,
    ParseMode, Recipient, ReplyMarkup, UserId,
};
use tracing::{debug, warn};

use crate::api::{BotApi, MediaKind};
use crate::config::TelegramConfig;
use crate::error::ApiError;

pub struct HttpBotApi {
    bot: Bot,
}

fn failed(method: &str, err: teloxide::RequestError) -> ApiError {
    let error = ApiError::from_request(method, &err);
    if !error.is_not_modified() {
        warn!(method = %method, error = %error, "Telegram API returned an error");
    }
    error
}

impl HttpBotApi {
    pub fn new(config: TelegramConfig) -> Result<Self, ApiError> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                method: "client".to_string(),
                message: e.to_string(),
            })?;
        let url = reqwest::Url::parse(&config.api_url).map_err(|e| ApiError::Transport {
            method: "client".to_string(),
            message: format!("invalid API URL {}: {}", config.api_url, e),
        })?;
        let bot = Bot::with_client(config.bot_token, client).set_api_url(url);
        Ok(Self { bot })
    }
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, ApiError> {
        debug!(chat_id = chat_id.0, "Telegram API call: sendMessage");
        let mut req = self.bot.send_message(chat_id, text);
        req.parse_mode = Some(ParseMode::Html);
        req.reply_markup = keyboard.map(ReplyMarkup::InlineKeyboard);
        let sent = req.await.map_err(|e| failed("sendMessage", e))?;
        Ok(sent.id)
    }

    async fn send_media(
        &self,
        chat_id: Recipient,
        kind: MediaKind,
        file_id: FileId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError> {
        debug!(method = kind.method(), "Telegram API call");
        let file = InputFile::file_id(file_id);
        let caption = caption.map(str::to_string);
        let sent = match kind {
            MediaKind::Photo => {
                let mut req = self.bot.send_photo(chat_id, file);
                req.caption = caption;
                req.parse_mode = Some(ParseMode::Html);
                req.await
            }
            MediaKind::Video => {
                let mut req = self.bot.send_video(chat_id, file);
                req.caption = caption;
                req.parse_mode = Some(ParseMode::Html);
                req.await
            }
            MediaKind::Document => {
                let mut req = self.bot.send_document(chat_id, file);
                req.caption = caption;
                req.parse_mode = Some(ParseMode::Html);
                req.await
            }
        }
        .map_err(|e| failed(kind.method(), e))?;
        Ok(sent.id)
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), ApiError> {
        debug!(chat_id = chat_id.0, message_id = message_id.0, "Telegram API call: editMessageText");
        let mut req = self.bot.edit_message_text(chat_id, message_id, text);
        req.parse_mode = Some(ParseMode::Html);
        req.reply_markup = Some(keyboard);
        req.await.map_err(|e| failed("editMessageText", e))?;
        Ok(())
    }

    async fn edit_message_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: &str,
    ) -> Result<(), ApiError> {
        debug!(chat_id = chat_id.0, message_id = message_id.0, "Telegram API call: editMessageCaption");
        let mut req = self.bot.edit_message_caption(chat_id, message_id);
        req.caption = Some(caption.to_string());
        req.parse_mode = Some(ParseMode::Html);
        req.await.map_err(|e| failed("editMessageCaption", e))?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), ApiError> {
        self.bot
            .delete_message(chat_id, message_id)
            .await
            .map_err(|e| failed("deleteMessage", e))?;
        Ok(())
    }

    async fn copy_message(
        &self,
        chat_id: Recipient,
        from_chat_id: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError> {
        debug!(from_chat_id = from_chat_id.0, message_id = message_id.0, "Telegram API call: copyMessage");
        let mut req = self.bot.copy_message(chat_id, from_chat_id, message_id);
        if let Some(caption) = caption {
            req.caption = Some(caption.to_string());
            req.parse_mode = Some(ParseMode::Html);
        }
        req.await.map_err(|e| failed("copyMessage", e))
    }

    async fn answer_callback_query(&self, query: &CallbackQuery) -> Result<(), ApiError> {
        self.bot
            .answer_callback_query(query.id.clone())
            .await
            .map_err(|e| failed("answerCallbackQuery", e))?;
        Ok(())
    }

    async fn get_chat_member(
        &self,
        chat_id: Recipient,
        user_id: UserId,
    ) -> Result<ChatMember, ApiError> {
        self.bot
            .get_chat_member(chat_id, user_id)
            .await
            .map_err(|e| failed("getChatMember", e))
    }

    async fn create_chat_invite_link(&self, chat_id: Recipient) -> Result<String, ApiError> {
        let link = self
            .bot
            .create_chat_invite_link(chat_id)
            .await
            .map_err(|e| failed("createChatInviteLink", e))?;
        Ok(link.invite_link)
    }
}
