//! Config tests.

use crate::config::{BotConfig, StoreType};
use capbot_core::ChatRef;
use serial_test::serial;
use std::env;
use std::time::Duration;

const VARS: &[&str] = &[
    "BOT_TOKEN",
    "TELEGRAM_API_URL",
    "OWNER_ID",
    "FORCE_CHANNEL",
    "FORCE_GROUP",
    "LISTEN_ADDR",
    "WEBHOOK_PATH",
    "WEBHOOK_SECRET",
    "STORE_TYPE",
    "DATABASE_URL",
    "LOG_FILE",
    "BROADCAST_DELAY_MS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    env::set_var("BOT_TOKEN", "test_token");

    let config = BotConfig::load(None).unwrap();
    config.validate().unwrap();

    assert_eq!(config.bot_token(), "test_token");
    assert!(config.telegram_api_url().is_none());
    assert_eq!(config.database_url(), "./data/capbot.db");
    assert_eq!(config.log_file(), "logs/capbot.log");
    assert_eq!(config.webhook_path(), "/webhook");
    assert!(config.webhook_secret().is_none());
    assert_eq!(config.base().store_type, StoreType::Sqlite);
    assert_eq!(config.base().listen_addr.to_string(), "0.0.0.0:8080");

    let settings = config.bot_settings();
    assert_eq!(settings.owner_id, None);
    assert!(settings.force_channel.is_none());
    assert!(settings.force_group.is_none());
    assert_eq!(settings.broadcast_delay, Duration::from_millis(200));
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("BOT_TOKEN", "custom_token");
    env::set_var("TELEGRAM_API_URL", "http://127.0.0.1:8081/");
    env::set_var("OWNER_ID", "12345");
    env::set_var("FORCE_CHANNEL", "@my_channel");
    env::set_var("FORCE_GROUP", "-1009876");
    env::set_var("LISTEN_ADDR", "127.0.0.1:9000");
    env::set_var("WEBHOOK_PATH", "/tg/hook");
    env::set_var("WEBHOOK_SECRET", "s3cret");
    env::set_var("STORE_TYPE", "memory");
    env::set_var("BROADCAST_DELAY_MS", "50");

    let config = BotConfig::load(None).unwrap();
    config.validate().unwrap();

    assert_eq!(config.webhook_secret(), Some("s3cret"));
    assert_eq!(config.base().store_type, StoreType::Memory);
    let telegram = config.telegram_config();
    assert_eq!(telegram.bot_token, "custom_token");
    assert_eq!(telegram.api_url, "http://127.0.0.1:8081");
    let settings = config.bot_settings();
    assert_eq!(settings.owner_id, Some(12345));
    assert_eq!(
        settings.force_channel,
        Some(ChatRef::Username("@my_channel".into()))
    );
    assert_eq!(settings.force_group, Some(ChatRef::Id(-1009876)));
    assert_eq!(settings.broadcast_delay, Duration::from_millis(50));
    clear_env();
}

#[test]
#[serial]
fn test_token_override() {
    clear_env();
    env::set_var("BOT_TOKEN", "env_token");
    let config = BotConfig::load(Some("cli_token".to_string())).unwrap();
    assert_eq!(config.bot_token(), "cli_token");

    env::remove_var("BOT_TOKEN");
    let config = BotConfig::load(Some("cli_token".to_string())).unwrap();
    assert_eq!(config.bot_token(), "cli_token");
}

#[test]
#[serial]
fn test_missing_token_is_error() {
    clear_env();
    assert!(BotConfig::load(None).is_err());
}

#[test]
#[serial]
fn test_invalid_values_fail_fast() {
    clear_env();
    env::set_var("BOT_TOKEN", "t");
    env::set_var("TELEGRAM_API_URL", "not a url");
    let config = BotConfig::load(None).unwrap();
    assert!(config.validate().is_err());

    env::remove_var("TELEGRAM_API_URL");
    env::set_var("STORE_TYPE", "redis");
    assert!(BotConfig::load(None).is_err());

    env::remove_var("STORE_TYPE");
    env::set_var("FORCE_GROUP", "my group");
    assert!(BotConfig::load(None).is_err());

    env::remove_var("FORCE_GROUP");
    env::set_var("WEBHOOK_PATH", "webhook");
    let config = BotConfig::load(None).unwrap();
    assert!(config.validate().is_err());
    clear_env();
}
