//! Owner tools: linked user count and broadcast.

use capbot_core::Result;
use teloxide::types::ChatId;
use tracing::{info, warn};

use crate::context::RequestContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

pub async fn user_count(ctx: &RequestContext) -> Result<usize> {
    Ok(ctx.links().linked_users().await?.len())
}

/// Sends `text` as HTML to every linked user, pausing `broadcast_delay` between sends.
pub async fn broadcast(ctx: &RequestContext, text: &str) -> Result<BroadcastReport> {
    let users = ctx.links().linked_users().await?;
    info!(recipients = users.len(), "step: broadcast start");

    let mut report = BroadcastReport::default();
    for (i, user_id) in users.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(ctx.settings.broadcast_delay).await;
        }
        match ctx.api.send_message(ChatId(*user_id), text, None).await {
            Ok(_) => report.delivered += 1,
            Err(e) => {
                warn!(user_id, error = %e, "Broadcast delivery failed");
                report.failed += 1;
            }
        }
    }

    info!(
        delivered = report.delivered,
        failed = report.failed,
        "step: broadcast done"
    );
    Ok(report)
}
