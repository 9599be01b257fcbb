//! Storage crate: the key-value store behind all bot state.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`kv`] – KvStore trait, PutOptions, KvEntry
//! - [`keys`] – Namespaced key builders
//! - [`inmemory_store`] – InMemoryKvStore
//! - [`sqlite_store`] – SqliteKvStore
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod inmemory_store;
pub mod keys;
mod kv;
mod sqlite_pool;
mod sqlite_store;

pub use error::StorageError;
pub use inmemory_store::InMemoryKvStore;
pub use kv::{KvEntry, KvStore, PutOptions};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteKvStore;
