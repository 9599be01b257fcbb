//! # SQLite KV store
//!
//! Persistent [`KvStore`] on a single table:
//!
//! ```sql
//! CREATE TABLE kv (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL,
//!     expires_at INTEGER NULL  -- unix epoch milliseconds
//! );
//! ```
//!
//! Expired rows are filtered out by every query and removed by [`SqliteKvStore::purge_expired`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::kv::{KvEntry, KvStore, PutOptions};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteKvStore {
    pool_manager: SqlitePoolManager,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl SqliteKvStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating kv table if not exist");
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_kv_expires_at ON kv(expires_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes expired rows; returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(now_millis())
            .execute(self.pool_manager.pool())
            .await?;
        let removed = result.rows_affected();
        if removed > 0 {
            debug!(removed, "Purged expired kv rows");
        }
        Ok(removed)
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            "SELECT value FROM kv WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(now_millis())
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }
        let expires_at = options.expiration_ttl.map(|ttl| {
            let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            now_millis().saturating_add(ttl_ms)
        });

        sqlx::query(
            r#"
            INSERT INTO kv (key, value, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(key = %key, ttl = ?options.expiration_ttl, "kv put");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, StorageError> {
        // substr avoids LIKE wildcards in the prefix ('_' is common in keys).
        let rows = sqlx::query(
            r#"
            SELECT key, value FROM kv
            WHERE substr(key, 1, ?) = ? AND (expires_at IS NULL OR expires_at > ?)
            ORDER BY key
            "#,
        )
        .bind(prefix.chars().count() as i64)
        .bind(prefix)
        .bind(now_millis())
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| KvEntry {
                key: r.get("key"),
                value: Some(r.get("value")),
            })
            .collect())
    }
}
