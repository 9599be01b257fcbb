//! User → linked channel mapping (`user:<id>`).

use std::sync::Arc;

use capbot_core::{BotError, Result};
use storage::{keys, KvStore, PutOptions};
use tracing::{info, warn};

#[derive(Clone)]
pub struct UserLinks {
    store: Arc<dyn KvStore>,
}

impl UserLinks {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn link_channel(&self, user_id: i64, channel_id: i64) -> Result<()> {
        self.store
            .put(&keys::user(user_id), &channel_id.to_string(), PutOptions::default())
            .await?;
        info!(user_id, channel_id, "Channel linked");
        Ok(())
    }

    /// Returns whether a link existed.
    pub async fn unlink(&self, user_id: i64) -> Result<bool> {
        let key = keys::user(user_id);
        let existed = self.store.get(&key).await?.is_some();
        self.store.delete(&key).await?;
        if existed {
            info!(user_id, "Channel unlinked");
        }
        Ok(existed)
    }

    /// A stored value that is not a number counts as no link.
    pub async fn linked_channel(&self, user_id: i64) -> Result<Option<i64>> {
        let raw = self.store.get(&keys::user(user_id)).await?;
        Ok(raw.and_then(|v| match v.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(user_id, value = %v, "Ignoring non-numeric channel link");
                None
            }
        }))
    }

    /// The linked channel, or a not-found error telling the user to link one.
    pub async fn require_channel(&self, user_id: i64) -> Result<i64> {
        self.linked_channel(user_id)
            .await?
            .ok_or_else(|| BotError::not_found("link a channel first: /link <channel_id>"))
    }

    /// All users with a `user:` record, in key order.
    pub async fn linked_users(&self) -> Result<Vec<i64>> {
        let entries = self.store.list(keys::USER_PREFIX).await?;
        Ok(entries
            .iter()
            .filter_map(|e| keys::parse_user_key(&e.key))
            .collect())
    }
}

/// Channel posts carry numeric ids, so only numeric links can ever match.
pub fn parse_channel_id(text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BotError::validation("usage: /link <channel_id>"));
    }
    text.parse::<i64>().map_err(|_| {
        BotError::validation(format!(
            "'{}' is not a numeric channel id (e.g. -1001234567890)",
            text
        ))
    })
}
