//! Per-channel configuration record and its load-time normalization.
//!
//! Persisted JSON is written by [`ChannelConfig::to_json`] and read back with
//! [`ChannelConfig::from_json_lenient`]. Reading never fails: absent or malformed
//! data (wholly or per field) is replaced with defaults. Boolean flags only count
//! as set when stored as JSON `true`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::BotError;
use crate::types::ChatRef;

/// Placeholder replaced by the transformed caption inside `style_template`.
pub const CAPTION_PLACEHOLDER: &str = "{caption}";

/// One text replacement rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
    pub enabled: bool,
    /// `from` is a regular expression rather than a literal.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub regex: bool,
}

impl Replacement {
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            enabled: true,
            regex: false,
        }
    }

    pub fn pattern(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            regex: true,
            ..Self::literal(from, to)
        }
    }
}

/// HTML wrapping applied to one caption part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Pre,
    Spoiler,
    Quote,
    /// No wrapping.
    Plain,
}

impl FormatTag {
    pub const ALL: [FormatTag; 9] = [
        FormatTag::Bold,
        FormatTag::Italic,
        FormatTag::Underline,
        FormatTag::Strike,
        FormatTag::Code,
        FormatTag::Pre,
        FormatTag::Spoiler,
        FormatTag::Quote,
        FormatTag::Plain,
    ];

    /// HTML element name, `None` for [`FormatTag::Plain`].
    pub fn html_tag(self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("b"),
            Self::Italic => Some("i"),
            Self::Underline => Some("u"),
            Self::Strike => Some("s"),
            Self::Code => Some("code"),
            Self::Pre => Some("pre"),
            Self::Spoiler => Some("tg-spoiler"),
            Self::Quote => Some("blockquote"),
            Self::Plain => None,
        }
    }

    /// Wraps already-escaped text in this tag.
    pub fn wrap(self, escaped: &str) -> String {
        match self.html_tag() {
            Some(tag) => format!("<{tag}>{escaped}</{tag}>"),
            None => escaped.to_string(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "strike",
            Self::Code => "code",
            Self::Pre => "pre",
            Self::Spoiler => "spoiler",
            Self::Quote => "quote",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatTag {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "b" => Self::Bold,
            "italic" | "i" => Self::Italic,
            "underline" | "u" => Self::Underline,
            "strike" | "s" | "strikethrough" => Self::Strike,
            "code" | "mono" => Self::Code,
            "pre" => Self::Pre,
            "spoiler" | "tg-spoiler" => Self::Spoiler,
            "quote" | "blockquote" => Self::Quote,
            "plain" | "none" => Self::Plain,
            other => {
                return Err(BotError::validation(format!(
                    "unknown format '{}'; use one of: {}",
                    other,
                    FormatTag::ALL.map(FormatTag::name).join(", ")
                )))
            }
        };
        Ok(tag)
    }
}

/// Which caption part a [`FormatTag`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSlot {
    Body,
    Prefix,
    Suffix,
}

impl FormatSlot {
    pub fn default_tag(self) -> FormatTag {
        match self {
            Self::Body => FormatTag::Bold,
            Self::Prefix | Self::Suffix => FormatTag::Pre,
        }
    }
}

impl FromStr for FormatSlot {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" | "caption" => Ok(Self::Body),
            "prefix" | "pre" => Ok(Self::Prefix),
            "suffix" | "suf" => Ok(Self::Suffix),
            other => Err(BotError::validation(format!(
                "unknown part '{}'; use body, prefix or suffix",
                other
            ))),
        }
    }
}

/// Same-content forwarding. `enabled` implies `chat_id.is_some()`; writers enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardConfig {
    pub enabled: bool,
    pub chat_id: Option<ChatRef>,
}

impl ForwardConfig {
    /// The destination when forwarding is active.
    pub fn target(&self) -> Option<&ChatRef> {
        if self.enabled {
            self.chat_id.as_ref()
        } else {
            None
        }
    }
}

/// Subset of the config reset by a clear operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    Prefix,
    Suffix,
    Replacements,
    Style,
    Forwarding,
    All,
}

impl ClearScope {
    pub fn name(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Replacements => "replacements",
            Self::Style => "style",
            Self::Forwarding => "forwarding",
            Self::All => "all",
        }
    }
}

impl FromStr for ClearScope {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" | "pre" => Ok(Self::Prefix),
            "suffix" | "suf" => Ok(Self::Suffix),
            "replacements" | "replace" => Ok(Self::Replacements),
            "style" => Ok(Self::Style),
            "forwarding" | "forward" => Ok(Self::Forwarding),
            "all" | "" => Ok(Self::All),
            other => Err(BotError::validation(format!(
                "unknown clear scope '{}'; use prefix, suffix, replacements, style, forwarding or all",
                other
            ))),
        }
    }
}

/// Configuration of one channel (key `channel:<id>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub replacements: Vec<Replacement>,
    pub replacements_enabled: bool,
    pub style_caption: bool,
    pub style_template: String,
    pub caption_format: FormatTag,
    pub pre_format: FormatTag,
    pub suf_format: FormatTag,
    pub forward: ForwardConfig,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            replacements: Vec::new(),
            replacements_enabled: false,
            style_caption: false,
            style_template: CAPTION_PLACEHOLDER.to_string(),
            caption_format: FormatSlot::Body.default_tag(),
            pre_format: FormatSlot::Prefix.default_tag(),
            suf_format: FormatSlot::Suffix.default_tag(),
            forward: ForwardConfig::default(),
        }
    }
}

impl ChannelConfig {
    /// Parses a stored record, defaulting anything absent or malformed.
    pub fn from_json_lenient(raw: Option<&str>) -> Self {
        let value = raw.and_then(|r| serde_json::from_str::<Value>(r).ok());
        match value {
            Some(Value::Object(map)) => Self::from_map(&map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            prefix: non_empty_string(map.get("prefix")),
            suffix: non_empty_string(map.get("suffix")),
            replacements: map
                .get("replacements")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(replacement_from_value).collect())
                .unwrap_or_default(),
            replacements_enabled: strict_bool(map.get("replacements_enabled")),
            style_caption: strict_bool(map.get("style_caption")),
            style_template: non_empty_string(map.get("style_template"))
                .unwrap_or(defaults.style_template),
            caption_format: format_tag(map.get("caption_format"), FormatSlot::Body),
            pre_format: format_tag(map.get("pre_format"), FormatSlot::Prefix),
            suf_format: format_tag(map.get("suf_format"), FormatSlot::Suffix),
            forward: forward_from_map(map),
        }
    }

    /// Serialized, normalized form for the store.
    pub fn to_json(&self) -> String {
        let mut normalized = self.clone();
        normalized.normalize();
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string(&normalized).unwrap_or_else(|_| "{}".to_string())
    }

    /// Applies write-time invariants in place.
    pub fn normalize(&mut self) {
        if self.prefix.as_deref().is_some_and(str::is_empty) {
            self.prefix = None;
        }
        if self.suffix.as_deref().is_some_and(str::is_empty) {
            self.suffix = None;
        }
        if self.style_template.is_empty() {
            self.style_template = CAPTION_PLACEHOLDER.to_string();
        }
        if self.forward.chat_id.is_none() {
            self.forward.enabled = false;
        }
    }

    pub fn format(&self, slot: FormatSlot) -> FormatTag {
        match slot {
            FormatSlot::Body => self.caption_format,
            FormatSlot::Prefix => self.pre_format,
            FormatSlot::Suffix => self.suf_format,
        }
    }

    pub fn set_format(&mut self, slot: FormatSlot, tag: FormatTag) {
        match slot {
            FormatSlot::Body => self.caption_format = tag,
            FormatSlot::Prefix => self.pre_format = tag,
            FormatSlot::Suffix => self.suf_format = tag,
        }
    }

    /// Resets only the fields belonging to `scope`.
    pub fn clear(&mut self, scope: ClearScope) {
        let defaults = Self::default();
        match scope {
            ClearScope::Prefix => self.prefix = None,
            ClearScope::Suffix => self.suffix = None,
            ClearScope::Replacements => {
                self.replacements.clear();
                self.replacements_enabled = false;
            }
            ClearScope::Style => {
                self.style_caption = false;
                self.style_template = defaults.style_template;
                self.caption_format = defaults.caption_format;
                self.pre_format = defaults.pre_format;
                self.suf_format = defaults.suf_format;
            }
            ClearScope::Forwarding => self.forward = ForwardConfig::default(),
            ClearScope::All => *self = defaults,
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strict_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn format_tag(value: Option<&Value>, slot: FormatSlot) -> FormatTag {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| slot.default_tag())
}

fn replacement_from_value(value: &Value) -> Option<Replacement> {
    let obj = value.as_object()?;
    let from = obj.get("from")?.as_str()?.to_string();
    let to = obj.get("to").and_then(Value::as_str).unwrap_or("").to_string();
    // Older records omit `enabled`; only an explicit `false` disables a rule.
    let enabled = !matches!(obj.get("enabled"), Some(Value::Bool(false)));
    let regex = strict_bool(obj.get("regex"));
    Some(Replacement {
        from,
        to,
        enabled,
        regex,
    })
}

fn chat_ref_from_value(value: Option<&Value>) -> Option<ChatRef> {
    match value? {
        Value::Number(n) => n.as_i64().map(ChatRef::Id),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn forward_from_map(map: &Map<String, Value>) -> ForwardConfig {
    let forward = match map.get("forward").and_then(Value::as_object) {
        Some(obj) => ForwardConfig {
            enabled: strict_bool(obj.get("enabled")),
            chat_id: chat_ref_from_value(obj.get("chat_id")),
        },
        // Legacy records stored only a destination.
        None => match chat_ref_from_value(map.get("forward_channel")) {
            Some(chat_id) => ForwardConfig {
                enabled: true,
                chat_id: Some(chat_id),
            },
            None => ForwardConfig::default(),
        },
    };
    if forward.chat_id.is_none() {
        ForwardConfig::default()
    } else {
        forward
    }
}
