//! Pending free-text replies (`pending:<user id>`, one hour TTL).
//!
//! A "set ..." button stores what the next plain text message from the user
//! answers, plus the id of the prompt message to re-render afterwards.

use std::sync::Arc;
use std::time::Duration;

use capbot_core::Result;
use serde::{Deserialize, Serialize};
use storage::{keys, KvStore, PutOptions};
use tracing::{debug, warn};

pub const PENDING_TTL: Duration = Duration::from_secs(3600);

/// Which setting the awaited reply fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Prefix,
    Suffix,
    Forward,
    Link,
    StyleTemplate,
    Replacement,
}

impl PendingKind {
    /// Everything except linking operates on the linked channel.
    pub fn needs_channel(self) -> bool {
        !matches!(self, Self::Link)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Prefix => "Prefix",
            Self::Suffix => "Suffix",
            Self::Forward => "Forwarding",
            Self::Link => "Channel Link",
            Self::StyleTemplate => "Style Template",
            Self::Replacement => "Replacement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: PendingKind,
    pub prompt_message_id: i64,
}

#[derive(Clone)]
pub struct PendingStore {
    store: Arc<dyn KvStore>,
}

impl PendingStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Replaces any earlier pending action of the user.
    pub async fn set(&self, user_id: i64, action: PendingAction) -> Result<()> {
        let value = serde_json::to_string(&action).map_err(storage::StorageError::from)?;
        self.store
            .put(&keys::pending(user_id), &value, PutOptions::ttl(PENDING_TTL))
            .await?;
        debug!(user_id, action = ?action.action, "Pending action stored");
        Ok(())
    }

    /// Reads and deletes the pending action. Undecodable records are dropped.
    pub async fn take(&self, user_id: i64) -> Result<Option<PendingAction>> {
        let Some(raw) = self.store.take(&keys::pending(user_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<PendingAction>(&raw) {
            Ok(action) => Ok(Some(action)),
            Err(e) => {
                warn!(user_id, error = %e, "Dropping malformed pending action");
                Ok(None)
            }
        }
    }

    pub async fn exists(&self, user_id: i64) -> Result<bool> {
        Ok(self.store.get(&keys::pending(user_id)).await?.is_some())
    }
}
