//! Inline menu screens. Pure functions from state to text plus keyboard.
//!
//! Values typed by users are shown escaped; replacement numbers are 1-based here while
//! the callback payloads carry 0-based indices.

use capbot_core::{escape_html, escape_html_attr, transform, ChannelConfig, ClearScope, FormatSlot};
use teloxide::types::{InlineKeyboardButton as Button, InlineKeyboardMarkup};
use tracing::warn;

use crate::callback::CallbackAction;
use crate::pending::PendingKind;

/// Sample body used for the template preview in the settings view.
const PREVIEW_SAMPLE: &str = "Sample caption";

/// One rendered screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl MenuView {
    pub fn new(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

fn button(text: &str, action: CallbackAction) -> Button {
    Button::callback(text, action.to_string())
}

fn back_to_menu() -> Vec<Button> {
    vec![button("⬅️ Menu", CallbackAction::MainMenu)]
}

pub fn main_menu() -> MenuView {
    let keyboard = InlineKeyboardMarkup::default()
        .append_row(vec![button("🔍 View Settings", CallbackAction::ViewSettings)])
        .append_row(vec![button("✏️ Edit Settings", CallbackAction::EditMenu)])
        .append_row(vec![button(
            "🔄 Add Replacement",
            CallbackAction::Prompt(PendingKind::Replacement),
        )])
        .append_row(vec![button("🧹 Clear All", CallbackAction::Clear(ClearScope::All))]);
    MenuView::new("⚙️ <b>Main Menu</b> - Select an option:", keyboard)
}

pub fn edit_menu() -> MenuView {
    let prompt = |text: &str, kind| vec![button(text, CallbackAction::Prompt(kind))];
    let keyboard = InlineKeyboardMarkup::default()
        .append_row(prompt("🔠 Prefix", PendingKind::Prefix))
        .append_row(prompt("🔣 Suffix", PendingKind::Suffix))
        .append_row(prompt("➡️ Forwarding", PendingKind::Forward))
        .append_row(prompt("🔗 Channel Link", PendingKind::Link))
        .append_row(prompt("🎨 Style Template", PendingKind::StyleTemplate))
        .append_row(vec![button("🅱️ Caption Format", CallbackAction::FormatMenu)])
        .append_row(vec![button("🔤 Text Replacements", CallbackAction::ViewSettings)])
        .append_row(vec![button("⬅️ Back", CallbackAction::MainMenu)]);
    MenuView::new("✏️ <b>Edit Settings</b>:", keyboard)
}

/// Each button advances its slot to the next tag.
pub fn format_menu(config: &ChannelConfig) -> MenuView {
    let slots = [
        ("Caption", FormatSlot::Body),
        ("Prefix", FormatSlot::Prefix),
        ("Suffix", FormatSlot::Suffix),
    ];
    let mut keyboard = InlineKeyboardMarkup::default();
    for (label, slot) in slots {
        let text = format!("{}: {}", label, config.format(slot).name());
        keyboard = keyboard.append_row(vec![button(&text, CallbackAction::CycleFormat(slot))]);
    }
    keyboard = keyboard.append_row(vec![button("⬅️ Back", CallbackAction::EditMenu)]);
    MenuView::new(
        "🅱️ <b>Caption Format</b>\nTap a part to switch its formatting:",
        keyboard,
    )
}

/// Free-text prompt for one setting, with a cancel button.
pub fn prompt_view(kind: PendingKind) -> MenuView {
    let body = match kind {
        PendingKind::Prefix => {
            "🔠 Send the new <b>prefix</b>.\nExample: <code>🔥 New Movie:</code>"
        }
        PendingKind::Suffix => {
            "🔣 Send the new <b>suffix</b>.\nExample: <code>Join @MyChannel</code>"
        }
        PendingKind::Forward => {
            "➡️ Send the <b>forwarding target</b> (chat id or @username).\nExample: <code>-1001234567890</code>\nSend <code>off</code> to disable."
        }
        PendingKind::Link => {
            "🔗 Send the numeric id of the <b>channel</b> you manage.\nExample: <code>-1001234567890</code>"
        }
        PendingKind::StyleTemplate => {
            "🎨 Send the <b>style template</b>. <code>{caption}</code> marks where the caption goes.\nExample: <code>✨ {caption} ✨</code>"
        }
        PendingKind::Replacement => {
            "🔄 Send the <b>replacement</b> as <code>original | replacement</code>.\nExample: <code>HD | 4K</code>"
        }
    };
    let keyboard =
        InlineKeyboardMarkup::default().append_row(vec![button("❌ Cancel", CallbackAction::MainMenu)]);
    MenuView::new(body, keyboard)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "✅ On"
    } else {
        "❌ Off"
    }
}

fn or_none(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("<code>{}</code>", escape_html(v)),
        None => "<i>not set</i>".to_string(),
    }
}

/// Current settings of the linked channel with per-rule toggle and delete buttons.
pub fn settings_view(channel_id: Option<i64>, config: &ChannelConfig) -> MenuView {
    let mut lines = vec!["🔍 <b>Current Settings</b>".to_string(), String::new()];
    lines.push(match channel_id {
        Some(id) => format!("📢 Channel: <code>{}</code>", id),
        None => "📢 Channel: <i>not linked</i>".to_string(),
    });
    lines.push(format!("🔠 Prefix: {}", or_none(config.prefix.as_deref())));
    lines.push(format!("🔣 Suffix: {}", or_none(config.suffix.as_deref())));
    let forward = config.forward.target().map(|t| t.to_string());
    lines.push(format!(
        "➡️ Forwarding: {} {}",
        on_off(config.forward.enabled),
        or_none(forward.as_deref())
    ));
    lines.push(format!(
        "🅱️ Format: caption {}, prefix {}, suffix {}",
        config.format(FormatSlot::Body).name(),
        config.format(FormatSlot::Prefix).name(),
        config.format(FormatSlot::Suffix).name()
    ));
    lines.push(format!("🎨 Caption Styling: {}", on_off(config.style_caption)));
    lines.push(format!(
        "📝 Template: <code>{}</code>",
        escape_html(&config.style_template)
    ));
    if config.style_caption {
        lines.push(format!("👀 Preview:\n{}", transform(PREVIEW_SAMPLE, config)));
    }
    lines.push(format!(
        "🔤 Text Replacements: {}",
        on_off(config.replacements_enabled)
    ));
    if config.replacements.is_empty() {
        lines.push("   <i>no rules</i>".to_string());
    }
    for (i, rule) in config.replacements.iter().enumerate() {
        let marker = if rule.enabled { "✅" } else { "❌" };
        let kind = if rule.regex { " (regex)" } else { "" };
        lines.push(format!(
            "   {}. {} <code>{}</code> → <code>{}</code>{}",
            i + 1,
            marker,
            escape_html_attr(&rule.from),
            escape_html_attr(&rule.to),
            kind
        ));
    }

    let mut keyboard = InlineKeyboardMarkup::default();
    let toggles: Vec<Button> = config
        .replacements
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let text = format!("{} {}", if rule.enabled { "✅" } else { "❌" }, i + 1);
            button(&text, CallbackAction::ToggleReplacement(i))
        })
        .collect();
    for chunk in toggles.chunks(4) {
        keyboard = keyboard.append_row(chunk.to_vec());
    }
    let deletes: Vec<Button> = (0..config.replacements.len())
        .map(|i| button(&format!("🗑 {}", i + 1), CallbackAction::DeleteReplacement(i)))
        .collect();
    for chunk in deletes.chunks(4) {
        keyboard = keyboard.append_row(chunk.to_vec());
    }

    let replacements_toggle = if config.replacements_enabled {
        "🔴 Disable Replacements"
    } else {
        "🟢 Enable Replacements"
    };
    let style_toggle = if config.style_caption {
        "🔴 Disable Styling"
    } else {
        "🟢 Enable Styling"
    };
    let forward_toggle = if config.forward.enabled {
        "🔴 Disable Forward"
    } else {
        "🟢 Enable Forward"
    };
    keyboard = keyboard
        .append_row(vec![button(replacements_toggle, CallbackAction::ToggleReplacements)])
        .append_row(vec![
            button(style_toggle, CallbackAction::ToggleStyle),
            button(forward_toggle, CallbackAction::ToggleForwarding),
        ])
        .append_row(back_to_menu());

    MenuView::new(lines.join("\n"), keyboard)
}

/// URL buttons for both force-subscribe chats plus the re-check button.
pub fn join_prompt(channel_link: &str, group_link: &str, repeat: bool) -> MenuView {
    let text = if repeat {
        "❌ You're still not joined. Please join both and try again:"
    } else {
        "🔐 Please join both before using this bot:"
    };
    let mut keyboard = InlineKeyboardMarkup::default();
    for (label, link) in [("📢 Join Channel", channel_link), ("👥 Join Group", group_link)] {
        match reqwest::Url::parse(link) {
            Ok(url) => keyboard = keyboard.append_row(vec![Button::url(label, url)]),
            Err(e) => warn!(link, error = %e, "Skipping unparsable invite link"),
        }
    }
    keyboard = keyboard.append_row(vec![button("✅ I've Joined", CallbackAction::CheckJoined)]);
    MenuView::new(text, keyboard)
}

/// A one-line result with a button leading back to `back`.
pub fn notice(text: impl Into<String>, back_label: &str, back: CallbackAction) -> MenuView {
    let keyboard = InlineKeyboardMarkup::default().append_row(vec![button(back_label, back)]);
    MenuView::new(text, keyboard)
}

pub fn link_first() -> MenuView {
    notice(
        "❌ Please link a channel first!",
        "🔗 Link Channel",
        CallbackAction::Prompt(PendingKind::Link),
    )
}
