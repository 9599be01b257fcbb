//! # In-memory KV store
//!
//! Process-local implementation of [`KvStore`]. Data is lost on restart; used by tests
//! and by `STORE_TYPE=memory`. Expired entries are hidden on read and dropped lazily.
//!
//! The map sits behind `Arc<RwLock<>>`, so clones share the same data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::kv::{KvEntry, KvStore, PutOptions};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredValue {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn expires_at(options: PutOptions) -> Result<Option<DateTime<Utc>>, StorageError> {
    match options.expiration_ttl {
        None => Ok(None),
        Some(ttl) => {
            let ttl = chrono::Duration::from_std(ttl)
                .map_err(|e| StorageError::Database(format!("invalid ttl: {e}")))?;
            Ok(Some(Utc::now() + ttl))
        }
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(stored) if stored.is_live(now) => return Ok(Some(stored.value.clone())),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|v| !v.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }
        let stored = StoredValue {
            value: value.to_string(),
            expires_at: expires_at(options)?,
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), stored);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, StorageError> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        let mut found: Vec<KvEntry> = entries
            .iter()
            .filter(|(k, v)| k.starts_with(prefix) && v.is_live(now))
            .map(|(k, v)| KvEntry {
                key: k.clone(),
                value: Some(v.value.clone()),
            })
            .collect();
        found.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(found)
    }
}
