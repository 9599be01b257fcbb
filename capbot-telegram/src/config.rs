//! Bot API connection settings: token, API base URL, request timeout.
//! Loaded from BOT_TOKEN, TELEGRAM_API_URL and TELEGRAM_TIMEOUT_SECS.

use anyhow::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Base URL without trailing slash; teloxide posts methods to `{api_url}/bot{token}/{method}`.
    pub api_url: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    /// BOT_TOKEN is required; TELEGRAM_API_URL and TELEGRAM_TIMEOUT_SECS are optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let mut config = Self::with_token(bot_token);
        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            config = config.with_api_url(&url);
        }
        if let Ok(secs) = env::var("TELEGRAM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow::anyhow!("TELEGRAM_TIMEOUT_SECS must be a number"))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Official API endpoint and default timeout.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }
}
