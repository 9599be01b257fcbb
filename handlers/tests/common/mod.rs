//! Shared helpers for handlers integration tests: context wiring and update builders.

#![allow(dead_code)]

pub mod mock_api;

use std::sync::Arc;
use std::time::Duration;

use capbot_core::{ChatRef, Update};
use handlers::{BotSettings, RequestContext};
use serde_json::{json, Value};
use storage::InMemoryKvStore;

pub use mock_api::RecordingBotApi;

pub const USER: i64 = 42;
pub const OWNER: i64 = 1;
pub const CHANNEL: i64 = -1001;

pub struct Harness {
    pub ctx: RequestContext,
    pub api: RecordingBotApi,
    pub store: Arc<InMemoryKvStore>,
}

/// Context with no force-subscribe chats (gate open) and no broadcast delay.
pub fn harness() -> Harness {
    harness_with(BotSettings {
        owner_id: Some(OWNER),
        broadcast_delay: Duration::ZERO,
        ..BotSettings::default()
    })
}

pub fn harness_with(settings: BotSettings) -> Harness {
    let api = RecordingBotApi::new();
    let store = Arc::new(InMemoryKvStore::new());
    let ctx = RequestContext::new(store.clone(), Arc::new(api.clone()), settings);
    Harness { ctx, api, store }
}

/// Settings with both force-subscribe chats configured.
pub fn gated_settings() -> BotSettings {
    BotSettings {
        owner_id: Some(OWNER),
        force_channel: Some(ChatRef::Username("@force_chan".into())),
        force_group: Some(ChatRef::Id(-2002)),
        broadcast_delay: Duration::ZERO,
    }
}

const DATE: i64 = 1_700_000_000;

pub fn user(id: i64) -> Value {
    json!({"id": id, "is_bot": false, "first_name": "Test"})
}

fn private_chat(user_id: i64) -> Value {
    json!({"id": user_id, "type": "private", "first_name": "Test"})
}

fn channel_chat(channel_id: i64) -> Value {
    json!({"id": channel_id, "type": "channel", "title": "Channel"})
}

/// Parses an update envelope the way the webhook does.
pub fn update(body: Value) -> Update {
    serde_json::from_slice(&serde_json::to_vec(&body).unwrap()).unwrap()
}

fn private_message(user_id: i64, message_id: i64, extra: Value) -> Update {
    let mut message = json!({
        "message_id": message_id,
        "date": DATE,
        "chat": private_chat(user_id),
        "from": user(user_id),
    });
    merge(&mut message, extra);
    update(json!({"update_id": message_id, "message": message}))
}

fn channel_post(channel_id: i64, message_id: i64, extra: Value) -> Update {
    let mut post = json!({
        "message_id": message_id,
        "date": DATE,
        "chat": channel_chat(channel_id),
    });
    merge(&mut post, extra);
    update(json!({"update_id": message_id, "channel_post": post}))
}

fn merge(target: &mut Value, extra: Value) {
    if let (Some(target), Value::Object(extra)) = (target.as_object_mut(), extra) {
        target.extend(extra);
    }
}

pub fn private_text(user_id: i64, message_id: i64, text: &str) -> Update {
    private_message(user_id, message_id, json!({"text": text}))
}

/// A private photo without caption or text.
pub fn private_photo(user_id: i64, message_id: i64) -> Update {
    private_message(
        user_id,
        message_id,
        json!({"photo": [{"file_id": "p-file", "file_unique_id": "p-uid", "width": 90, "height": 90}]}),
    )
}

pub fn photo_post(channel_id: i64, message_id: i64, caption: Option<&str>) -> Update {
    let mut extra = json!({
        "photo": [
            {"file_id": "small-file", "file_unique_id": "small-uid", "width": 90, "height": 90},
            {"file_id": "big-file", "file_unique_id": "big-uid", "width": 800, "height": 800}
        ]
    });
    if let Some(caption) = caption {
        extra["caption"] = json!(caption);
    }
    channel_post(channel_id, message_id, extra)
}

pub fn document_post(channel_id: i64, message_id: i64, caption: &str) -> Update {
    channel_post(
        channel_id,
        message_id,
        json!({
            "caption": caption,
            "document": {"file_id": "doc-file", "file_unique_id": "doc-uid"}
        }),
    )
}

/// Captioned audio: media the bot does not re-send itself, so it is copied.
pub fn audio_post(channel_id: i64, message_id: i64, caption: &str) -> Update {
    channel_post(
        channel_id,
        message_id,
        json!({
            "caption": caption,
            "audio": {"file_id": "audio-file", "file_unique_id": "audio-uid", "duration": 180}
        }),
    )
}

pub fn text_post(channel_id: i64, message_id: i64, text: &str) -> Update {
    channel_post(channel_id, message_id, json!({"text": text}))
}

/// Button press on the menu message `message_id` in the user's private chat.
pub fn callback(user_id: i64, message_id: i64, data: &str) -> Update {
    update(json!({
        "update_id": message_id,
        "callback_query": {
            "id": format!("cb-{}", message_id),
            "from": user(user_id),
            "chat_instance": "ci",
            "message": {
                "message_id": message_id,
                "date": DATE,
                "chat": private_chat(user_id),
                "text": "menu"
            },
            "data": data
        }
    }))
}
