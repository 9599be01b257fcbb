//! # capbot-core
//!
//! Core types for the caption bot: [`BotError`], update routing over teloxide types, [`ChannelConfig`]
//! and its normalization, the caption [`transform`] pipeline, the post fingerprint and
//! tracing initialization. No I/O besides logging; used by storage, capbot-telegram and handlers.

pub mod caption;
pub mod channel_config;
pub mod error;
pub mod hash;
pub mod logger;
pub mod types;

pub use caption::{escape_html, escape_html_attr, transform};
pub use channel_config::{
    ChannelConfig, ClearScope, FormatSlot, FormatTag, ForwardConfig, Replacement,
    CAPTION_PLACEHOLDER,
};
pub use error::{BotError, Result};
pub use hash::content_fingerprint;
pub use logger::init_tracing;
pub use types::{route, ChatRef, MessageExt, Route};

pub use teloxide::types::{CallbackQuery, Message, Update};
