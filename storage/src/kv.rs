//! # Key-value store
//!
//! [`KvStore`] is the only persistence seam of the bot. Values are opaque strings
//! (JSON records or plain ids); keys are colon-namespaced, see [`crate::keys`].
//!
//! Implementations:
//!
//! - [`InMemoryKvStore`](crate::InMemoryKvStore): process-local, for tests and `STORE_TYPE=memory`
//! - [`SqliteKvStore`](crate::SqliteKvStore): persistent single-file store
//!
//! Entries written with a TTL are invisible to every read once expired.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::StorageError;

/// Options for [`KvStore::put`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Time after which the entry expires. `None` keeps it forever.
    pub expiration_ttl: Option<Duration>,
}

impl PutOptions {
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            expiration_ttl: Some(ttl),
        }
    }
}

/// One row of a [`KvStore::list`] result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    pub key: String,
    pub value: Option<String>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Inserts or overwrites `key`.
    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StorageError>;

    /// Removes `key`; deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Live entries whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, StorageError>;

    /// Reads and removes `key` (pending replies are consumed this way).
    async fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }
}
