//! Unit tests for ChannelConfigManager: defaults, rule edits, toggles, clear scopes.

use std::sync::Arc;

use capbot_core::{BotError, ChatRef, ClearScope, FormatSlot, FormatTag};
use storage::{keys, InMemoryKvStore, KvStore, PutOptions};

use crate::manager::{parse_replacement_pair, parse_rule_number, ChannelConfigManager};

const CHANNEL: i64 = -1001;

fn manager() -> (ChannelConfigManager, Arc<InMemoryKvStore>) {
    let store = Arc::new(InMemoryKvStore::new());
    (ChannelConfigManager::new(store.clone()), store)
}

/// **Test: an unseen channel loads as a fully defaulted config.**
#[tokio::test]
async fn test_load_unseen_channel_defaults() {
    let (manager, _) = manager();
    let config = manager.load(CHANNEL).await.unwrap();
    assert_eq!(config.prefix, None);
    assert_eq!(config.suffix, None);
    assert!(config.replacements.is_empty());
    assert!(!config.replacements_enabled);
    assert!(!config.style_caption);
    assert_eq!(config.style_template, "{caption}");
}

/// **Test: a malformed stored record counts as absent.**
#[tokio::test]
async fn test_load_malformed_record() {
    let (manager, store) = manager();
    store
        .put(&keys::channel(CHANNEL), "{not json", PutOptions::default())
        .await
        .unwrap();
    let config = manager.load(CHANNEL).await.unwrap();
    assert!(config.replacements.is_empty());
}

#[tokio::test]
async fn test_add_and_remove_replacement() {
    let (manager, _) = manager();
    manager.add_replacement(CHANNEL, " foo ", "bar").await.unwrap();
    let config = manager.add_replacement(CHANNEL, "a", "b").await.unwrap();
    assert_eq!(config.replacements.len(), 2);
    assert_eq!(config.replacements[0].from, "foo");
    assert!(config.replacements[0].enabled);

    let removed = manager.remove_replacement(CHANNEL, 0).await.unwrap();
    assert_eq!(removed.from, "foo");
    let config = manager.load(CHANNEL).await.unwrap();
    assert_eq!(config.replacements.len(), 1);
    assert_eq!(config.replacements[0].from, "a");
}

/// **Test: out-of-bounds removal is NotFound and leaves the list unchanged.**
#[tokio::test]
async fn test_remove_out_of_bounds() {
    let (manager, _) = manager();
    manager.add_replacement(CHANNEL, "foo", "bar").await.unwrap();

    let err = manager.remove_replacement(CHANNEL, 5).await.unwrap_err();
    assert!(matches!(err, BotError::NotFound(_)));
    assert_eq!(err.user_message(), Some("replacement #6 does not exist"));
    assert_eq!(manager.load(CHANNEL).await.unwrap().replacements.len(), 1);

    let err = manager.toggle_replacement(CHANNEL, 1).await.unwrap_err();
    assert!(matches!(err, BotError::NotFound(_)));
}

#[tokio::test]
async fn test_add_replacement_validation() {
    let (manager, _) = manager();
    let err = manager.add_replacement(CHANNEL, "  ", "bar").await.unwrap_err();
    assert!(matches!(err, BotError::Validation(_)));

    let err = manager
        .add_regex_replacement(CHANNEL, "(unclosed", "x")
        .await
        .unwrap_err();
    assert!(matches!(err, BotError::Validation(_)));
    assert!(manager.load(CHANNEL).await.unwrap().replacements.is_empty());

    let config = manager
        .add_regex_replacement(CHANNEL, r"\d+p", "HD")
        .await
        .unwrap();
    assert!(config.replacements[0].regex);
}

#[tokio::test]
async fn test_toggles() {
    let (manager, _) = manager();
    manager.add_replacement(CHANNEL, "foo", "bar").await.unwrap();
    assert!(!manager.toggle_replacement(CHANNEL, 0).await.unwrap());
    assert!(manager.toggle_replacement(CHANNEL, 0).await.unwrap());
    assert!(manager.toggle_replacements_enabled(CHANNEL).await.unwrap());
    assert!(manager.toggle_style(CHANNEL).await.unwrap());
    assert!(!manager.toggle_style(CHANNEL).await.unwrap());
}

/// **Test: forwarding cannot be enabled without a target; a target enables it.**
#[tokio::test]
async fn test_forwarding_invariant() {
    let (manager, _) = manager();
    let err = manager.toggle_forwarding(CHANNEL).await.unwrap_err();
    assert!(matches!(err, BotError::Validation(_)));
    assert!(!manager.load(CHANNEL).await.unwrap().forward.enabled);

    let config = manager
        .set_forward_target(CHANNEL, Some(ChatRef::Id(-2002)))
        .await
        .unwrap();
    assert!(config.forward.enabled);
    assert_eq!(config.forward.target(), Some(&ChatRef::Id(-2002)));

    // Disabling keeps the target, so re-enabling works.
    assert!(!manager.toggle_forwarding(CHANNEL).await.unwrap());
    assert!(manager.toggle_forwarding(CHANNEL).await.unwrap());

    let config = manager.set_forward_target(CHANNEL, None).await.unwrap();
    assert!(!config.forward.enabled);
    assert_eq!(config.forward.chat_id, None);
}

#[tokio::test]
async fn test_prefix_suffix_unset_on_empty() {
    let (manager, store) = manager();
    let config = manager.set_prefix(CHANNEL, "  NEW ").await.unwrap();
    assert_eq!(config.prefix.as_deref(), Some("NEW"));
    manager.set_suffix(CHANNEL, "@Chan").await.unwrap();

    let config = manager.set_prefix(CHANNEL, "   ").await.unwrap();
    assert_eq!(config.prefix, None);
    let raw = store.get(&keys::channel(CHANNEL)).await.unwrap().unwrap();
    assert!(!raw.contains("\"prefix\""));
    assert!(raw.contains("@Chan"));
}

#[tokio::test]
async fn test_style_template_empty_restores_default() {
    let (manager, _) = manager();
    let config = manager.set_style_template(CHANNEL, "✨ {caption} ✨").await.unwrap();
    assert_eq!(config.style_template, "✨ {caption} ✨");
    let config = manager.set_style_template(CHANNEL, "").await.unwrap();
    assert_eq!(config.style_template, "{caption}");
}

#[tokio::test]
async fn test_format_set_and_cycle() {
    let (manager, _) = manager();
    let config = manager
        .set_format(CHANNEL, FormatSlot::Body, FormatTag::Italic)
        .await
        .unwrap();
    assert_eq!(config.caption_format, FormatTag::Italic);

    let before = manager.load(CHANNEL).await.unwrap().format(FormatSlot::Suffix);
    let after = manager.cycle_format(CHANNEL, FormatSlot::Suffix).await.unwrap();
    assert_ne!(before, after);
    assert_eq!(manager.load(CHANNEL).await.unwrap().suf_format, after);
}

/// **Test: each clear scope resets only its own subset.**
#[tokio::test]
async fn test_clear_scopes() {
    let (manager, _) = manager();
    manager.set_prefix(CHANNEL, "NEW").await.unwrap();
    manager.set_suffix(CHANNEL, "@Chan").await.unwrap();
    manager.add_replacement(CHANNEL, "foo", "bar").await.unwrap();
    manager.toggle_replacements_enabled(CHANNEL).await.unwrap();
    manager.toggle_style(CHANNEL).await.unwrap();

    let config = manager.clear(CHANNEL, ClearScope::Replacements).await.unwrap();
    assert!(config.replacements.is_empty());
    assert!(!config.replacements_enabled);
    assert_eq!(config.prefix.as_deref(), Some("NEW"));
    assert!(config.style_caption);

    let config = manager.clear(CHANNEL, ClearScope::Prefix).await.unwrap();
    assert_eq!(config.prefix, None);
    assert_eq!(config.suffix.as_deref(), Some("@Chan"));

    let config = manager.clear(CHANNEL, ClearScope::All).await.unwrap();
    assert_eq!(config, capbot_core::ChannelConfig::default());
}

#[test]
fn test_parse_replacement_pair() {
    assert_eq!(
        parse_replacement_pair(" old | new ").unwrap(),
        ("old".to_string(), "new".to_string())
    );
    // Only the first separator splits.
    assert_eq!(
        parse_replacement_pair("a|b|c").unwrap(),
        ("a".to_string(), "b|c".to_string())
    );
    assert!(parse_replacement_pair("no separator").is_err());
    assert!(parse_replacement_pair(" | new").is_err());
}

#[test]
fn test_parse_rule_number() {
    assert_eq!(parse_rule_number("1").unwrap(), 0);
    assert_eq!(parse_rule_number(" 3 ").unwrap(), 2);
    assert!(parse_rule_number("0").is_err());
    assert!(parse_rule_number("x").is_err());
}
