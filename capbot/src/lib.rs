//! # capbot
//!
//! Application crate: env config, CLI, the axum webhook server and the runner that wires
//! the KV store, the Bot API client and the handlers together.

pub mod cli;
pub mod config;
pub mod runner;
pub mod server;

pub use cli::{load_config, Cli, Commands};
pub use config::{BaseConfig, BotConfig, StoreType};
pub use runner::{build_context, build_store, run_bot};
pub use server::{router, AppState, SECRET_HEADER};
