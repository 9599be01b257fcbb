//! Subscription Gate: the user must be a member of the force-subscribe channel and group.
//!
//! Checks fail closed: a remote error counts as "not subscribed". Invite links for the
//! join prompt are cached under `invite:<kind>` and never invalidated.

use capbot_core::ChatRef;
use capbot_telegram::ApiError;
use storage::{keys, PutOptions};
use teloxide::types::{ChatMemberStatus, UserId};
use tracing::{debug, info, warn};

use crate::context::RequestContext;

/// Returned when no invite link can be produced. Not cached.
pub const FALLBACK_INVITE_URL: &str = "https://t.me/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Channel,
    Group,
}

impl GateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Group => "group",
        }
    }
}

/// Outcome of one membership check.
#[derive(Debug, Clone)]
pub enum MembershipCheck {
    Member,
    NotMember(ChatMemberStatus),
    Failed(ApiError),
}

impl MembershipCheck {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Member)
    }
}

pub async fn check_membership(ctx: &RequestContext, chat: &ChatRef, user_id: i64) -> MembershipCheck {
    let member = ctx
        .api
        .get_chat_member(chat.recipient(), UserId(user_id as u64));
    match member.await {
        Ok(member) => match member.kind.status() {
            ChatMemberStatus::Owner | ChatMemberStatus::Administrator | ChatMemberStatus::Member => {
                MembershipCheck::Member
            }
            status => MembershipCheck::NotMember(status),
        },
        Err(e) => MembershipCheck::Failed(e),
    }
}

/// Both configured chats must report the user as joined. Unconfigured slots are skipped.
pub async fn is_subscribed(ctx: &RequestContext, user_id: i64) -> bool {
    let slots = [
        (GateKind::Channel, ctx.settings.force_channel.as_ref()),
        (GateKind::Group, ctx.settings.force_group.as_ref()),
    ];
    let mut subscribed = true;
    // Sequential and independent: the second check runs even if the first failed.
    for (kind, chat) in slots {
        let Some(chat) = chat else { continue };
        match check_membership(ctx, chat, user_id).await {
            MembershipCheck::Member => {
                debug!(user_id, gate = kind.as_str(), "Membership confirmed");
            }
            MembershipCheck::NotMember(status) => {
                info!(user_id, gate = kind.as_str(), status = ?status, "User has not joined");
                subscribed = false;
            }
            MembershipCheck::Failed(e) => {
                warn!(user_id, gate = kind.as_str(), error = %e, "Membership check failed, treating as not joined");
                subscribed = false;
            }
        }
    }
    subscribed
}

/// Cached invite link for `kind`; `@name` chats get `https://t.me/name` without a remote call.
/// Never fails: any error yields [`FALLBACK_INVITE_URL`].
pub async fn resolve_invite_link(ctx: &RequestContext, kind: GateKind, chat: &ChatRef) -> String {
    let key = keys::invite(kind.as_str());
    match ctx.store.get(&key).await {
        Ok(Some(link)) => return link,
        Ok(None) => {}
        Err(e) => warn!(gate = kind.as_str(), error = %e, "Invite cache read failed"),
    }

    let link = match chat.username() {
        Some(name) => format!("https://t.me/{}", name),
        None => {
            match ctx.api.create_chat_invite_link(chat.recipient()).await {
                Ok(created) => created,
                Err(e) => {
                    warn!(gate = kind.as_str(), error = %e, "Could not create invite link");
                    return FALLBACK_INVITE_URL.to_string();
                }
            }
        }
    };

    match ctx.store.put(&key, &link, PutOptions::default()).await {
        Ok(()) => info!(gate = kind.as_str(), "Invite link cached"),
        Err(e) => warn!(gate = kind.as_str(), error = %e, "Invite cache write failed"),
    }
    link
}

/// Invite links for both gate slots; an unconfigured slot gets the fallback URL.
pub async fn join_links(ctx: &RequestContext) -> (String, String) {
    let channel = match &ctx.settings.force_channel {
        Some(chat) => resolve_invite_link(ctx, GateKind::Channel, chat).await,
        None => FALLBACK_INVITE_URL.to_string(),
    };
    let group = match &ctx.settings.force_group {
        Some(chat) => resolve_invite_link(ctx, GateKind::Group, chat).await,
        None => FALLBACK_INVITE_URL.to_string(),
    };
    (channel, group)
}
