//! Storage error types.
//!
//! Used by [`KvStore`](crate::KvStore) implementations; converts into [`BotError::Storage`].

use capbot_core::BotError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<StorageError> for BotError {
    fn from(e: StorageError) -> Self {
        BotError::Storage(e.to_string())
    }
}
