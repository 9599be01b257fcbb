//! RecordingBotApi
//!
//! - In-memory `BotApi` for tests: every call is recorded as `(method, json body)`.
//! - Sent messages get increasing ids starting at 1000.
//! - Per-method failures and per-chat member statuses are configurable.
//! - Member statuses are limited to `creator`, `member` and `left`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use capbot_core::ChatRef;
use capbot_telegram::{ApiError, BotApi, MediaKind};
use serde_json::{json, Value};
use teloxide::types::{
    CallbackQuery, ChatId, ChatMember, FileId, InlineKeyboardMarkup, MessageId, Recipient, UserId,
};

#[derive(Clone)]
pub struct RecordingBotApi {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    failures: Arc<Mutex<HashMap<String, ApiError>>>,
    /// Status per chat (`ChatRef` display form); missing chats answer "left".
    statuses: Arc<Mutex<HashMap<String, Result<String, ApiError>>>>,
    next_message_id: Arc<AtomicI32>,
}

impl Default for RecordingBotApi {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            statuses: Arc::new(Mutex::new(HashMap::new())),
            next_message_id: Arc::new(AtomicI32::new(1000)),
        }
    }
}

/// Display form shared with [`ChatRef`]: the numeric id or the `@name`.
fn chat_key(chat: &Recipient) -> String {
    match chat {
        Recipient::Id(id) => id.0.to_string(),
        Recipient::ChannelUsername(name) => name.clone(),
    }
}

fn chat_json(chat: &Recipient) -> Value {
    match chat {
        Recipient::Id(id) => json!(id.0),
        Recipient::ChannelUsername(name) => json!(name),
    }
}

impl RecordingBotApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `method` fail with a Telegram error.
    pub fn fail(&self, method: &str, description: &str) {
        self.failures.lock().unwrap().insert(
            method.to_string(),
            ApiError::Telegram {
                method: method.to_string(),
                description: description.to_string(),
            },
        );
    }

    /// Makes every later call of `method` fail as an unchanged edit.
    pub fn fail_not_modified(&self, method: &str) {
        self.failures.lock().unwrap().insert(
            method.to_string(),
            ApiError::NotModified {
                method: method.to_string(),
            },
        );
    }

    pub fn set_status(&self, chat: &ChatRef, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(chat.to_string(), Ok(status.to_string()));
    }

    /// `getChatMember` for `chat` fails at the transport level.
    pub fn set_status_unreachable(&self, chat: &ChatRef) {
        self.statuses.lock().unwrap().insert(
            chat.to_string(),
            Err(ApiError::Transport {
                method: "getChatMember".to_string(),
                message: "connection refused".to_string(),
            }),
        );
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of all calls to `method`, in order.
    pub fn bodies(&self, method: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| m == method)
            .map(|(_, body)| body)
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.bodies(method).len()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, method: &str, body: Value) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push((method.to_string(), body));
        match self.failures.lock().unwrap().get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// Bodies mirror the Bot API JSON teloxide sends for the same call.
#[async_trait]
impl BotApi for RecordingBotApi {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, ApiError> {
        let mut body = json!({"chat_id": chat_id.0, "text": text, "parse_mode": "HTML"});
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard).unwrap();
        }
        self.record("sendMessage", body)?;
        Ok(self.next_id())
    }

    async fn send_media(
        &self,
        chat_id: Recipient,
        kind: MediaKind,
        file_id: FileId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError> {
        let mut body = json!({"chat_id": chat_json(&chat_id), "parse_mode": "HTML"});
        let field = match kind {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        };
        body[field] = json!(file_id.0);
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
        }
        self.record(kind.method(), body)?;
        Ok(self.next_id())
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), ApiError> {
        let body = json!({
            "chat_id": chat_id.0,
            "message_id": message_id.0,
            "text": text,
            "parse_mode": "HTML",
            "reply_markup": serde_json::to_value(keyboard).unwrap(),
        });
        self.record("editMessageText", body)
    }

    async fn edit_message_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "chat_id": chat_id.0,
            "message_id": message_id.0,
            "caption": caption,
            "parse_mode": "HTML",
        });
        self.record("editMessageCaption", body)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), ApiError> {
        self.record(
            "deleteMessage",
            json!({"chat_id": chat_id.0, "message_id": message_id.0}),
        )
    }

    async fn copy_message(
        &self,
        chat_id: Recipient,
        from_chat_id: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
    ) -> Result<MessageId, ApiError> {
        let mut body = json!({
            "chat_id": chat_json(&chat_id),
            "from_chat_id": from_chat_id.0,
            "message_id": message_id.0,
        });
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
            body["parse_mode"] = json!("HTML");
        }
        self.record("copyMessage", body)?;
        Ok(self.next_id())
    }

    async fn answer_callback_query(&self, query: &CallbackQuery) -> Result<(), ApiError> {
        let body = json!({"callback_query_id": serde_json::to_value(&query.id).unwrap()});
        self.record("answerCallbackQuery", body)
    }

    async fn get_chat_member(
        &self,
        chat_id: Recipient,
        user_id: UserId,
    ) -> Result<ChatMember, ApiError> {
        self.record(
            "getChatMember",
            json!({"chat_id": chat_json(&chat_id), "user_id": user_id.0}),
        )?;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(&chat_key(&chat_id))
            .cloned()
            .unwrap_or_else(|| Ok("left".to_string()))?;
        let member = json!({
            "user": {"id": user_id.0, "is_bot": false, "first_name": "Test"},
            "status": status,
            "is_anonymous": false,
        });
        Ok(serde_json::from_value(member).unwrap())
    }

    async fn create_chat_invite_link(&self, chat_id: Recipient) -> Result<String, ApiError> {
        self.record(
            "createChatInviteLink",
            json!({"chat_id": chat_json(&chat_id)}),
        )?;
        Ok(format!("https://t.me/+invite{}", chat_key(&chat_id)))
    }
}
