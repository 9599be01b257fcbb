//! Base config: Telegram connection, gate chats, webhook, store and logging. Loaded from env.

use anyhow::{Context, Result};
use capbot_core::ChatRef;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Which [`storage::KvStore`] backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Sqlite,
}

impl StoreType {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("STORE_TYPE must be 'memory' or 'sqlite', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL
    pub telegram_api_url: Option<String>,
    /// OWNER_ID, allowed to run /users and /broadcast
    pub owner_id: Option<i64>,
    /// FORCE_CHANNEL (chat id or @username)
    pub force_channel: Option<ChatRef>,
    /// FORCE_GROUP (chat id or @username)
    pub force_group: Option<ChatRef>,
    pub listen_addr: SocketAddr,
    pub webhook_path: String,
    /// Expected X-Telegram-Bot-Api-Secret-Token
    pub webhook_secret: Option<String>,
    pub store_type: StoreType,
    /// SQLite file path or `sqlite:` URL
    pub database_url: String,
    pub log_file: String,
    pub broadcast_delay: Duration,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn chat_var(name: &str) -> Result<Option<ChatRef>> {
    optional_var(name)
        .map(|v| {
            v.parse::<ChatRef>()
                .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e))
        })
        .transpose()
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => optional_var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let owner_id = optional_var("OWNER_ID")
            .map(|v| v.parse::<i64>().context("OWNER_ID must be a numeric user id"))
            .transpose()?;
        let listen_addr = optional_var("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .context("LISTEN_ADDR must be host:port")?;
        let webhook_path =
            optional_var("WEBHOOK_PATH").unwrap_or_else(|| "/webhook".to_string());
        let store_type = StoreType::parse(
            &optional_var("STORE_TYPE").unwrap_or_else(|| "sqlite".to_string()),
        )?;
        let broadcast_delay_ms = optional_var("BROADCAST_DELAY_MS")
            .map(|v| v.parse::<u64>().context("BROADCAST_DELAY_MS must be a number"))
            .transpose()?
            .unwrap_or(200);

        Ok(Self {
            bot_token,
            telegram_api_url: optional_var("TELEGRAM_API_URL"),
            owner_id,
            force_channel: chat_var("FORCE_CHANNEL")?,
            force_group: chat_var("FORCE_GROUP")?,
            listen_addr,
            webhook_path,
            webhook_secret: optional_var("WEBHOOK_SECRET"),
            store_type,
            database_url: optional_var("DATABASE_URL")
                .unwrap_or_else(|| "./data/capbot.db".to_string()),
            log_file: optional_var("LOG_FILE").unwrap_or_else(|| "logs/capbot.log".to_string()),
            broadcast_delay: Duration::from_millis(broadcast_delay_ms),
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!("TELEGRAM_API_URL is set but not a valid URL: {}", url_str);
            }
        }
        if !self.webhook_path.starts_with('/') {
            anyhow::bail!("WEBHOOK_PATH must start with '/': {}", self.webhook_path);
        }
        Ok(())
    }
}
