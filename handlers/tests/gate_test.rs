//! Integration tests for the subscription gate and invite link cache.

mod common;

use capbot_core::ChatRef;
use handlers::gate::{check_membership, join_links, FALLBACK_INVITE_URL};
use handlers::{is_subscribed, resolve_invite_link, GateKind, MembershipCheck};
use storage::{keys, KvStore};
use teloxide::types::ChatMemberStatus;

use common::{gated_settings, harness, harness_with, USER};

fn force_chan() -> ChatRef {
    ChatRef::Username("@force_chan".into())
}

fn force_group() -> ChatRef {
    ChatRef::Id(-2002)
}

#[tokio::test]
async fn test_open_gate_checks_nothing() {
    let h = harness();
    assert!(is_subscribed(&h.ctx, USER).await);
    assert_eq!(h.api.count("getChatMember"), 0);
}

#[tokio::test]
async fn test_member_of_both_passes() {
    let h = harness_with(gated_settings());
    h.api.set_status(&force_chan(), "member");
    h.api.set_status(&force_group(), "creator");
    assert!(is_subscribed(&h.ctx, USER).await);
    assert_eq!(h.api.count("getChatMember"), 2);
}

/// **Test: one failed remote check closes the gate; the other check still runs.**
#[tokio::test]
async fn test_one_remote_failure_fails_closed() {
    let h = harness_with(gated_settings());
    h.api.set_status_unreachable(&force_chan());
    h.api.set_status(&force_group(), "creator");

    assert!(!is_subscribed(&h.ctx, USER).await);
    assert_eq!(h.api.count("getChatMember"), 2);

    assert!(matches!(
        check_membership(&h.ctx, &force_chan(), USER).await,
        MembershipCheck::Failed(_)
    ));
}

#[tokio::test]
async fn test_left_is_not_a_member() {
    let h = harness_with(gated_settings());
    h.api.set_status(&force_chan(), "member");
    h.api.set_status(&force_group(), "left");
    assert!(!is_subscribed(&h.ctx, USER).await);

    let check = check_membership(&h.ctx, &ChatRef::Id(-9), USER).await;
    assert!(matches!(
        check,
        MembershipCheck::NotMember(ChatMemberStatus::Left)
    ));
    assert!(!check.passed());
}

/// **Test: two resolutions of the same kind make exactly one remote call.**
#[tokio::test]
async fn test_invite_link_created_once() {
    let h = harness_with(gated_settings());
    let first = resolve_invite_link(&h.ctx, GateKind::Group, &force_group()).await;
    let second = resolve_invite_link(&h.ctx, GateKind::Group, &force_group()).await;

    assert_eq!(first, "https://t.me/+invite-2002");
    assert_eq!(first, second);
    assert_eq!(h.api.count("createChatInviteLink"), 1);
    assert_eq!(
        h.store.get(&keys::invite("group")).await.unwrap().as_deref(),
        Some(first.as_str())
    );
}

#[tokio::test]
async fn test_username_chat_needs_no_remote_call() {
    let h = harness_with(gated_settings());
    let link = resolve_invite_link(&h.ctx, GateKind::Channel, &force_chan()).await;
    assert_eq!(link, "https://t.me/force_chan");
    assert_eq!(h.api.count("createChatInviteLink"), 0);
}

/// **Test: a failed creation yields the fallback, which is not cached.**
#[tokio::test]
async fn test_fallback_not_cached() {
    let h = harness_with(gated_settings());
    h.api.fail("createChatInviteLink", "Bad Request: not enough rights");

    let link = resolve_invite_link(&h.ctx, GateKind::Group, &force_group()).await;
    assert_eq!(link, FALLBACK_INVITE_URL);
    assert_eq!(h.store.get(&keys::invite("group")).await.unwrap(), None);

    resolve_invite_link(&h.ctx, GateKind::Group, &force_group()).await;
    assert_eq!(h.api.count("createChatInviteLink"), 2);
}

#[tokio::test]
async fn test_join_links_for_both_slots() {
    let h = harness_with(gated_settings());
    let (channel, group) = join_links(&h.ctx).await;
    assert_eq!(channel, "https://t.me/force_chan");
    assert_eq!(group, "https://t.me/+invite-2002");
}
