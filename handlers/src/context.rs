//! Request-scoped context passed to every handler operation.

use std::sync::Arc;
use std::time::Duration;

use capbot_core::ChatRef;
use capbot_telegram::{ApiError, BotApi};
use storage::KvStore;
use tracing::warn;

use crate::links::UserLinks;
use crate::manager::ChannelConfigManager;
use crate::pending::PendingStore;

/// Deployment settings the handlers read.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// User allowed to run /users and /broadcast.
    pub owner_id: Option<i64>,
    /// Force-subscribe channel; `None` skips that check.
    pub force_channel: Option<ChatRef>,
    /// Force-subscribe group; `None` skips that check.
    pub force_group: Option<ChatRef>,
    /// Pause between broadcast sends.
    pub broadcast_delay: Duration,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            owner_id: None,
            force_channel: None,
            force_group: None,
            broadcast_delay: Duration::from_millis(200),
        }
    }
}

/// Store, API client and settings for one update. Cheap to clone.
#[derive(Clone)]
pub struct RequestContext {
    pub store: Arc<dyn KvStore>,
    pub api: Arc<dyn BotApi>,
    pub settings: Arc<BotSettings>,
}

impl RequestContext {
    pub fn new(store: Arc<dyn KvStore>, api: Arc<dyn BotApi>, settings: BotSettings) -> Self {
        Self {
            store,
            api,
            settings: Arc::new(settings),
        }
    }

    pub fn configs(&self) -> ChannelConfigManager {
        ChannelConfigManager::new(self.store.clone())
    }

    pub fn links(&self) -> UserLinks {
        UserLinks::new(self.store.clone())
    }

    pub fn pending(&self) -> PendingStore {
        PendingStore::new(self.store.clone())
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.settings.owner_id == Some(user_id)
    }
}

/// Logs a failed remote call and turns it into `None`.
pub(crate) fn swallow<T>(result: Result<T, ApiError>, action: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(action = %action, method = %e.method(), error = %e, "Remote call failed");
            None
        }
    }
}
