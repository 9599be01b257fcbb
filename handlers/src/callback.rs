//! Inline button payloads (`callback_data`), decoded once into [`CallbackAction`].

use std::fmt;

use capbot_core::{ClearScope, FormatSlot};

use crate::pending::PendingKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MainMenu,
    ViewSettings,
    EditMenu,
    FormatMenu,
    /// Ask for a free-text value and remember it as pending.
    Prompt(PendingKind),
    Clear(ClearScope),
    /// 0-based rule index.
    ToggleReplacement(usize),
    /// 0-based rule index.
    DeleteReplacement(usize),
    ToggleReplacements,
    ToggleStyle,
    ToggleForwarding,
    CycleFormat(FormatSlot),
    CheckJoined,
    Unknown(String),
}

impl CallbackAction {
    pub fn decode(data: &str) -> Self {
        match data {
            "main_menu" => Self::MainMenu,
            "view_settings" => Self::ViewSettings,
            "edit_menu" => Self::EditMenu,
            "format_menu" => Self::FormatMenu,
            "set_prefix" => Self::Prompt(PendingKind::Prefix),
            "set_suffix" => Self::Prompt(PendingKind::Suffix),
            "set_forward" => Self::Prompt(PendingKind::Forward),
            "set_link" => Self::Prompt(PendingKind::Link),
            "set_style_template" => Self::Prompt(PendingKind::StyleTemplate),
            "add_replace" => Self::Prompt(PendingKind::Replacement),
            "clear_prefix" => Self::Clear(ClearScope::Prefix),
            "clear_suffix" => Self::Clear(ClearScope::Suffix),
            "clear_replacements" => Self::Clear(ClearScope::Replacements),
            "clear_style" => Self::Clear(ClearScope::Style),
            "clear_forwarding" => Self::Clear(ClearScope::Forwarding),
            "clear_all" => Self::Clear(ClearScope::All),
            "toggle_replacements" => Self::ToggleReplacements,
            "toggle_style" => Self::ToggleStyle,
            "toggle_forwarding" => Self::ToggleForwarding,
            "cycle_format_body" => Self::CycleFormat(FormatSlot::Body),
            "cycle_format_prefix" => Self::CycleFormat(FormatSlot::Prefix),
            "cycle_format_suffix" => Self::CycleFormat(FormatSlot::Suffix),
            "check_joined" => Self::CheckJoined,
            other => {
                if let Some(index) = indexed(other, "toggle_replace_") {
                    Self::ToggleReplacement(index)
                } else if let Some(index) = indexed(other, "del_replace_") {
                    Self::DeleteReplacement(index)
                } else {
                    Self::Unknown(other.to_string())
                }
            }
        }
    }
}

fn indexed(data: &str, prefix: &str) -> Option<usize> {
    data.strip_prefix(prefix)?.parse().ok()
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainMenu => f.write_str("main_menu"),
            Self::ViewSettings => f.write_str("view_settings"),
            Self::EditMenu => f.write_str("edit_menu"),
            Self::FormatMenu => f.write_str("format_menu"),
            Self::Prompt(kind) => f.write_str(match kind {
                PendingKind::Prefix => "set_prefix",
                PendingKind::Suffix => "set_suffix",
                PendingKind::Forward => "set_forward",
                PendingKind::Link => "set_link",
                PendingKind::StyleTemplate => "set_style_template",
                PendingKind::Replacement => "add_replace",
            }),
            Self::Clear(scope) => write!(f, "clear_{}", scope.name()),
            Self::ToggleReplacement(i) => write!(f, "toggle_replace_{}", i),
            Self::DeleteReplacement(i) => write!(f, "del_replace_{}", i),
            Self::ToggleReplacements => f.write_str("toggle_replacements"),
            Self::ToggleStyle => f.write_str("toggle_style"),
            Self::ToggleForwarding => f.write_str("toggle_forwarding"),
            Self::CycleFormat(slot) => f.write_str(match slot {
                FormatSlot::Body => "cycle_format_body",
                FormatSlot::Prefix => "cycle_format_prefix",
                FormatSlot::Suffix => "cycle_format_suffix",
            }),
            Self::CheckJoined => f.write_str("check_joined"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}
