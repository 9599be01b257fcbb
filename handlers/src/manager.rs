//! Channel Configuration Manager: load, normalize and mutate `channel:<id>` records.
//!
//! Every mutation is a read-modify-write of the whole record. Nothing is written when
//! the mutation fails, so validation and not-found errors leave the stored record as it was.
//! Indices are 0-based here; chat text shows them 1-based.

use std::sync::Arc;

use capbot_core::caption::compile_rule;
use capbot_core::{
    BotError, ChannelConfig, ChatRef, ClearScope, FormatSlot, FormatTag, Replacement, Result,
};
use storage::{keys, KvStore, PutOptions};
use tracing::{debug, info};

#[derive(Clone)]
pub struct ChannelConfigManager {
    store: Arc<dyn KvStore>,
}

impl ChannelConfigManager {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Absent or malformed records yield a defaulted config; only store failures are errors.
    pub async fn load(&self, channel_id: i64) -> Result<ChannelConfig> {
        let raw = self.store.get(&keys::channel(channel_id)).await?;
        if raw.is_none() {
            debug!(channel_id, "No stored config, using defaults");
        }
        Ok(ChannelConfig::from_json_lenient(raw.as_deref()))
    }

    pub async fn save(&self, channel_id: i64, config: &ChannelConfig) -> Result<()> {
        self.store
            .put(&keys::channel(channel_id), &config.to_json(), PutOptions::default())
            .await?;
        Ok(())
    }

    /// Loads, applies `f` and saves. If `f` fails nothing is written.
    pub async fn update<T, F>(&self, channel_id: i64, f: F) -> Result<(ChannelConfig, T)>
    where
        F: FnOnce(&mut ChannelConfig) -> Result<T>,
    {
        let mut config = self.load(channel_id).await?;
        let out = f(&mut config)?;
        config.normalize();
        self.save(channel_id, &config).await?;
        Ok((config, out))
    }

    pub async fn add_replacement(&self, channel_id: i64, from: &str, to: &str) -> Result<ChannelConfig> {
        let rule = validated_rule(from, to, false)?;
        let (config, ()) = self
            .update(channel_id, |c| {
                c.replacements.push(rule);
                Ok(())
            })
            .await?;
        info!(channel_id, rules = config.replacements.len(), "Replacement added");
        Ok(config)
    }

    /// Like [`Self::add_replacement`] but `from` is a regular expression; it must compile.
    pub async fn add_regex_replacement(
        &self,
        channel_id: i64,
        pattern: &str,
        to: &str,
    ) -> Result<ChannelConfig> {
        let rule = validated_rule(pattern, to, true)?;
        let (config, ()) = self
            .update(channel_id, |c| {
                c.replacements.push(rule);
                Ok(())
            })
            .await?;
        info!(channel_id, rules = config.replacements.len(), "Regex replacement added");
        Ok(config)
    }

    /// Removes and returns the rule at `index`.
    pub async fn remove_replacement(&self, channel_id: i64, index: usize) -> Result<Replacement> {
        let (_, removed) = self
            .update(channel_id, |c| {
                if index >= c.replacements.len() {
                    return Err(replacement_not_found(index));
                }
                Ok(c.replacements.remove(index))
            })
            .await?;
        info!(channel_id, index, "Replacement removed");
        Ok(removed)
    }

    /// Flips one rule; returns its new `enabled` state.
    pub async fn toggle_replacement(&self, channel_id: i64, index: usize) -> Result<bool> {
        let (_, enabled) = self
            .update(channel_id, |c| {
                let rule = c
                    .replacements
                    .get_mut(index)
                    .ok_or_else(|| replacement_not_found(index))?;
                rule.enabled = !rule.enabled;
                Ok(rule.enabled)
            })
            .await?;
        Ok(enabled)
    }

    pub async fn toggle_replacements_enabled(&self, channel_id: i64) -> Result<bool> {
        let (config, ()) = self
            .update(channel_id, |c| {
                c.replacements_enabled = !c.replacements_enabled;
                Ok(())
            })
            .await?;
        Ok(config.replacements_enabled)
    }

    pub async fn toggle_style(&self, channel_id: i64) -> Result<bool> {
        let (config, ()) = self
            .update(channel_id, |c| {
                c.style_caption = !c.style_caption;
                Ok(())
            })
            .await?;
        Ok(config.style_caption)
    }

    /// Enabling requires a target; disabling keeps it for later.
    pub async fn toggle_forwarding(&self, channel_id: i64) -> Result<bool> {
        let (config, ()) = self
            .update(channel_id, |c| {
                if !c.forward.enabled && c.forward.chat_id.is_none() {
                    return Err(BotError::validation(
                        "set a forwarding target first (chat id or @username)",
                    ));
                }
                c.forward.enabled = !c.forward.enabled;
                Ok(())
            })
            .await?;
        Ok(config.forward.enabled)
    }

    /// Empty (after trimming) unsets the prefix.
    pub async fn set_prefix(&self, channel_id: i64, text: &str) -> Result<ChannelConfig> {
        let value = non_empty(text);
        let (config, ()) = self
            .update(channel_id, |c| {
                c.prefix = value;
                Ok(())
            })
            .await?;
        Ok(config)
    }

    /// Empty (after trimming) unsets the suffix.
    pub async fn set_suffix(&self, channel_id: i64, text: &str) -> Result<ChannelConfig> {
        let value = non_empty(text);
        let (config, ()) = self
            .update(channel_id, |c| {
                c.suffix = value;
                Ok(())
            })
            .await?;
        Ok(config)
    }

    /// Empty restores the default template.
    pub async fn set_style_template(&self, channel_id: i64, template: &str) -> Result<ChannelConfig> {
        let template = template.trim().to_string();
        let (config, ()) = self
            .update(channel_id, |c| {
                c.style_template = template;
                Ok(())
            })
            .await?;
        Ok(config)
    }

    /// `Some` sets the target and enables forwarding; `None` disables it and clears the target.
    pub async fn set_forward_target(
        &self,
        channel_id: i64,
        target: Option<ChatRef>,
    ) -> Result<ChannelConfig> {
        let (config, ()) = self
            .update(channel_id, |c| {
                c.forward.enabled = target.is_some();
                c.forward.chat_id = target;
                Ok(())
            })
            .await?;
        info!(channel_id, forward = ?config.forward.target(), "Forward target updated");
        Ok(config)
    }

    pub async fn set_format(
        &self,
        channel_id: i64,
        slot: FormatSlot,
        tag: FormatTag,
    ) -> Result<ChannelConfig> {
        let (config, ()) = self
            .update(channel_id, |c| {
                c.set_format(slot, tag);
                Ok(())
            })
            .await?;
        Ok(config)
    }

    /// Advances the slot's tag through [`FormatTag::ALL`]; returns the new tag.
    pub async fn cycle_format(&self, channel_id: i64, slot: FormatSlot) -> Result<FormatTag> {
        let (_, tag) = self
            .update(channel_id, |c| {
                let current = c.format(slot);
                let pos = FormatTag::ALL.iter().position(|t| *t == current).unwrap_or(0);
                let next = FormatTag::ALL[(pos + 1) % FormatTag::ALL.len()];
                c.set_format(slot, next);
                Ok(next)
            })
            .await?;
        Ok(tag)
    }

    pub async fn clear(&self, channel_id: i64, scope: ClearScope) -> Result<ChannelConfig> {
        let (config, ()) = self
            .update(channel_id, |c| {
                c.clear(scope);
                Ok(())
            })
            .await?;
        info!(channel_id, scope = scope.name(), "Config cleared");
        Ok(config)
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn replacement_not_found(index: usize) -> BotError {
    BotError::not_found(format!("replacement #{} does not exist", index + 1))
}

fn validated_rule(from: &str, to: &str, regex: bool) -> Result<Replacement> {
    let from = from.trim();
    let to = to.trim();
    if from.is_empty() || to.is_empty() {
        return Err(BotError::validation(
            "both sides of a replacement must be non-empty: original | replacement",
        ));
    }
    let rule = if regex {
        Replacement::pattern(from, to)
    } else {
        Replacement::literal(from, to)
    };
    if regex {
        compile_rule(&rule)
            .map_err(|e| BotError::validation(format!("invalid regular expression: {e}")))?;
    }
    Ok(rule)
}

/// Splits `old | new` on the first `|`.
pub fn parse_replacement_pair(text: &str) -> Result<(String, String)> {
    let (from, to) = text
        .split_once('|')
        .ok_or_else(|| BotError::validation("invalid format, use: original | replacement"))?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(BotError::validation(
            "both sides of a replacement must be non-empty: original | replacement",
        ));
    }
    Ok((from.to_string(), to.to_string()))
}

/// Parses a 1-based rule number as typed by a user into a 0-based index.
pub fn parse_rule_number(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(BotError::validation(format!(
            "'{}' is not a rule number; use the number shown in /show",
            text.trim()
        ))),
    }
}
