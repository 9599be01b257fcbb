//! BotConfig: BaseConfig plus the derived per-crate settings. Use load() for env-based loading.

use anyhow::Result;
use capbot_telegram::TelegramConfig;
use handlers::BotSettings;

use super::BaseConfig;

pub struct BotConfig {
    pub base: BaseConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            base: BaseConfig::load(token)?,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn webhook_path(&self) -> &str {
        &self.base.webhook_path
    }
    pub fn webhook_secret(&self) -> Option<&str> {
        self.base.webhook_secret.as_deref()
    }

    /// Settings for the Bot API client.
    pub fn telegram_config(&self) -> TelegramConfig {
        let config = TelegramConfig::with_token(self.base.bot_token.clone());
        match self.telegram_api_url() {
            Some(url) => config.with_api_url(url),
            None => config,
        }
    }

    /// Settings the update handlers read.
    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            owner_id: self.base.owner_id,
            force_channel: self.base.force_channel.clone(),
            force_group: self.base.force_group.clone(),
            broadcast_delay: self.base.broadcast_delay,
        }
    }
}
