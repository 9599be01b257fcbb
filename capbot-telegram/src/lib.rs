//! # capbot-telegram
//!
//! Telegram Bot API layer: the [`BotApi`] trait, the teloxide-backed [`HttpBotApi`] and its
//! [`TelegramConfig`]. Only outbound calls live here; inbound update routing is in capbot-core.

mod api;
mod config;
mod error;
mod http_api;

pub use api::{BotApi, MediaKind};
pub use config::{TelegramConfig, DEFAULT_API_URL};
pub use error::ApiError;
pub use http_api::HttpBotApi;
