use anyhow::Result;
use capbot_core::init_tracing;
use capbot_telegram::HttpBotApi;
use handlers::RequestContext;
use std::sync::Arc;
use std::time::Duration;
use storage::{InMemoryKvStore, KvStore, SqliteKvStore};
use tracing::{info, warn};

use crate::config::{BotConfig, StoreType};
use crate::server::{router, AppState};

const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Builds the configured store. SQLite stores get an hourly purge of expired rows.
pub async fn build_store(config: &BotConfig) -> Result<Arc<dyn KvStore>> {
    match config.base().store_type {
        StoreType::Memory => {
            info!("Using in-memory KV store");
            Ok(Arc::new(InMemoryKvStore::new()))
        }
        StoreType::Sqlite => {
            info!(database_url = %config.database_url(), "Using SQLite KV store");
            let store = Arc::new(SqliteKvStore::new(config.database_url()).await?);
            let purger = store.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    match purger.purge_expired().await {
                        Ok(0) => {}
                        Ok(removed) => info!(removed, "Purged expired KV entries"),
                        Err(e) => warn!(error = %e, "Purging expired KV entries failed"),
                    }
                }
            });
            Ok(store as Arc<dyn KvStore>)
        }
    }
}

/// Request context shared by every webhook call.
pub async fn build_context(config: &BotConfig) -> Result<RequestContext> {
    let store = build_store(config).await?;
    let api = HttpBotApi::new(config.telegram_config())?;
    Ok(RequestContext::new(store, Arc::new(api), config.bot_settings()))
}

/// Runs the webhook server until Ctrl-C.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(Some(config.log_file()))?;
    config.validate()?;

    info!(
        listen_addr = %config.base().listen_addr,
        webhook_path = %config.webhook_path(),
        gate_channel = ?config.base().force_channel,
        gate_group = ?config.base().force_group,
        "step: starting capbot"
    );

    let ctx = build_context(&config).await?;
    let state = AppState {
        ctx,
        webhook_secret: config.webhook_secret().map(str::to_string),
    };
    let app = router(state, config.webhook_path());

    let listener = tokio::net::TcpListener::bind(config.base().listen_addr).await?;
    info!(addr = %config.base().listen_addr, "Webhook server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("capbot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
