//! Bot configuration: BaseConfig (env) and BotConfig (derived crate settings).

mod base;
mod bot_config;

#[cfg(test)]
mod tests;

pub use base::{BaseConfig, StoreType};
pub use bot_config::BotConfig;
