//! Private chat messages: subscription gate, commands, pending replies, help.

use capbot_core::{
    BotError, ChatRef, ClearScope, FormatSlot, FormatTag, Message, MessageExt, Result,
};
use tracing::{debug, info, instrument, warn};

use crate::broadcast::{broadcast, user_count};
use crate::callback::CallbackAction;
use crate::commands::{help_text, Command};
use crate::context::{swallow, RequestContext};
use crate::gate::{is_subscribed, join_links};
use crate::links::parse_channel_id;
use crate::manager::{parse_replacement_pair, parse_rule_number};
use crate::menu::{self, MenuView};
use crate::pending::{PendingAction, PendingKind};
use crate::render::{reply, show_menu};

#[instrument(skip(ctx, message), fields(chat_id = message.chat.id.0))]
pub async fn handle_private_message(ctx: &RequestContext, message: &Message) -> Result<()> {
    let user_id = message.sender_id();

    if !ctx.is_owner(user_id) && !is_subscribed(ctx, user_id).await {
        info!(user_id, "step: user not subscribed, sending join prompt");
        let (channel, group) = join_links(ctx).await;
        return show_menu(ctx, user_id, None, &menu::join_prompt(&channel, &group, false)).await;
    }

    // Photos, stickers and other non-text messages never answer a pending prompt.
    let Some(text) = message.text() else {
        debug!(user_id, "step: non-text message, sending help");
        reply(ctx, user_id, help_text()).await;
        return Ok(());
    };

    if let Some(command) = Command::parse(text) {
        debug!(user_id, command = ?command, "step: command");
        return match run_command(ctx, user_id, command).await {
            Err(e) if e.is_user_facing() => {
                reply(ctx, user_id, format!("❌ {}", user_text(&e))).await;
                Ok(())
            }
            other => other,
        };
    }

    if let Some(pending) = ctx.pending().take(user_id).await? {
        info!(user_id, action = ?pending.action, "step: consuming pending reply");
        return answer_pending(ctx, user_id, message, text, pending).await;
    }

    debug!(user_id, "step: plain text without pending action, sending help");
    reply(ctx, user_id, help_text()).await;
    Ok(())
}

/// Escaped text of a user-facing error.
pub(crate) fn user_text(e: &BotError) -> String {
    capbot_core::escape_html(e.user_message().unwrap_or("something went wrong"))
}

async fn run_command(ctx: &RequestContext, user_id: i64, command: Command) -> Result<()> {
    if command.needs_channel() {
        let channel = ctx.links().require_channel(user_id).await?;
        return run_channel_command(ctx, user_id, channel, command).await;
    }

    let links = ctx.links();
    match command {
        Command::Start | Command::Menu => show_menu(ctx, user_id, None, &menu::main_menu()).await,
        Command::Help => {
            reply(ctx, user_id, help_text()).await;
            Ok(())
        }
        Command::Link(args) => {
            let channel_id = parse_channel_id(&args)?;
            links.link_channel(user_id, channel_id).await?;
            reply(ctx, user_id, format!("✅ Channel <code>{}</code> linked.", channel_id)).await;
            Ok(())
        }
        Command::Unlink => {
            let text = if links.unlink(user_id).await? {
                "✅ Channel unlinked."
            } else {
                "ℹ️ No channel was linked."
            };
            reply(ctx, user_id, text).await;
            Ok(())
        }
        Command::Users => {
            if !ctx.is_owner(user_id) {
                return owner_only(ctx, user_id).await;
            }
            let count = user_count(ctx).await?;
            reply(ctx, user_id, format!("👥 Linked users: <b>{}</b>", count)).await;
            Ok(())
        }
        Command::Broadcast(text) => {
            if !ctx.is_owner(user_id) {
                return owner_only(ctx, user_id).await;
            }
            if text.is_empty() {
                return Err(BotError::validation("usage: /broadcast <text>"));
            }
            let report = broadcast(ctx, &text).await?;
            reply(
                ctx,
                user_id,
                format!(
                    "📣 Broadcast finished: {} delivered, {} failed.",
                    report.delivered, report.failed
                ),
            )
            .await;
            Ok(())
        }
        Command::Unknown(name) => {
            reply(
                ctx,
                user_id,
                format!(
                    "❓ Unknown command /{}. Send /help for the list.",
                    capbot_core::escape_html(&name)
                ),
            )
            .await;
            Ok(())
        }
        other => {
            debug!(command = ?other, "step: channel command outside the channel branch");
            Ok(())
        }
    }
}

/// Commands that edit the config of the linked `channel`.
async fn run_channel_command(
    ctx: &RequestContext,
    user_id: i64,
    channel: i64,
    command: Command,
) -> Result<()> {
    let configs = ctx.configs();
    let confirmation = match command {
        Command::Prefix(text) => {
            let config = configs.set_prefix(channel, &text).await?;
            set_or_removed("Prefix", config.prefix.is_some())
        }
        Command::Suffix(text) => {
            let config = configs.set_suffix(channel, &text).await?;
            set_or_removed("Suffix", config.suffix.is_some())
        }
        Command::AddReplace(args) => {
            let (from, to) = parse_replacement_pair(&args)?;
            let config = configs.add_replacement(channel, &from, &to).await?;
            format!("✅ Replacement #{} added.", config.replacements.len())
        }
        Command::AddRegex(args) => {
            let (pattern, to) = parse_replacement_pair(&args)?;
            let config = configs.add_regex_replacement(channel, &pattern, &to).await?;
            format!("✅ Regex replacement #{} added.", config.replacements.len())
        }
        Command::DelReplace(args) => {
            let index = parse_rule_number(&args)?;
            let removed = configs.remove_replacement(channel, index).await?;
            format!(
                "🗑 Removed replacement #{}: <code>{}</code> → <code>{}</code>",
                index + 1,
                capbot_core::escape_html(&removed.from),
                capbot_core::escape_html(&removed.to)
            )
        }
        Command::ToggleReplace(args) => {
            let index = parse_rule_number(&args)?;
            let enabled = configs.toggle_replacement(channel, index).await?;
            format!("✅ Replacement #{} is now {}.", index + 1, on_off(enabled))
        }
        Command::ToggleReplacements => {
            let enabled = configs.toggle_replacements_enabled(channel).await?;
            format!("✅ Text replacements are now {}.", on_off(enabled))
        }
        Command::Forward(args) => {
            let target = parse_forward_target(&args)?;
            let config = configs.set_forward_target(channel, target).await?;
            match config.forward.target() {
                Some(target) => format!("✅ Forwarding to <code>{}</code>.", target),
                None => "✅ Forwarding disabled.".to_string(),
            }
        }
        Command::ToggleForward => {
            let enabled = configs.toggle_forwarding(channel).await?;
            format!("✅ Forwarding is now {}.", on_off(enabled))
        }
        Command::Style(template) => {
            configs.set_style_template(channel, &template).await?;
            "✅ Style template updated.".to_string()
        }
        Command::ToggleStyle => {
            let enabled = configs.toggle_style(channel).await?;
            format!("✅ Caption styling is now {}.", on_off(enabled))
        }
        Command::Format(args) => {
            let (slot, tag) = parse_format_args(&args)?;
            configs.set_format(channel, slot, tag).await?;
            format!("✅ Format set to {}.", tag)
        }
        Command::Show => {
            let config = configs.load(channel).await?;
            return show_menu(ctx, user_id, None, &menu::settings_view(Some(channel), &config)).await;
        }
        Command::Clear(args) => {
            let scope: ClearScope = args.parse()?;
            configs.clear(channel, scope).await?;
            cleared(scope)
        }
        _ => return Ok(()),
    };
    reply(ctx, user_id, confirmation).await;
    Ok(())
}

async fn owner_only(ctx: &RequestContext, user_id: i64) -> Result<()> {
    warn!(user_id, "step: owner command from non-owner");
    reply(ctx, user_id, "⛔ This command is only available to the bot owner.").await;
    Ok(())
}

/// Applies a free-text answer and re-renders the prompt message with the outcome.
async fn answer_pending(
    ctx: &RequestContext,
    user_id: i64,
    message: &Message,
    text: &str,
    pending: PendingAction,
) -> Result<()> {
    let delete = ctx.api.delete_message(message.chat.id, message.id);
    swallow(delete.await, "delete reply");

    let view = match apply_pending(ctx, user_id, pending.action, text).await {
        Ok(view) => view,
        Err(BotError::NotFound(_)) if pending.action.needs_channel() => menu::link_first(),
        Err(e) if e.is_user_facing() => menu::notice(
            format!("❌ {}", user_text(&e)),
            "🔄 Try Again",
            CallbackAction::Prompt(pending.action),
        ),
        Err(e) => return Err(e),
    };
    show_menu(ctx, user_id, Some(pending.prompt_message_id), &view).await
}

async fn apply_pending(
    ctx: &RequestContext,
    user_id: i64,
    kind: PendingKind,
    text: &str,
) -> Result<MenuView> {
    if kind == PendingKind::Link {
        let channel_id = parse_channel_id(text)?;
        ctx.links().link_channel(user_id, channel_id).await?;
        return Ok(done(format!("✅ Channel <code>{}</code> linked!", channel_id)));
    }

    let channel = ctx.links().require_channel(user_id).await?;
    let configs = ctx.configs();
    match kind {
        PendingKind::Prefix => {
            configs.set_prefix(channel, text).await?;
        }
        PendingKind::Suffix => {
            configs.set_suffix(channel, text).await?;
        }
        PendingKind::Forward => {
            configs.set_forward_target(channel, parse_forward_target(text)?).await?;
        }
        PendingKind::StyleTemplate => {
            configs.set_style_template(channel, text).await?;
        }
        PendingKind::Replacement => {
            let (from, to) = parse_replacement_pair(text)?;
            configs.add_replacement(channel, &from, &to).await?;
        }
        PendingKind::Link => {}
    }
    Ok(done(format!("✅ {} updated successfully!", kind.label())))
}

fn done(text: String) -> MenuView {
    menu::notice(text, "⬅️ Menu", CallbackAction::MainMenu)
}

/// `off` or `disabled` turns forwarding off; anything else must be a chat id or `@username`.
pub(crate) fn parse_forward_target(text: &str) -> Result<Option<ChatRef>> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "" => Err(BotError::validation(
            "send a chat id or @username, or 'off' to disable forwarding",
        )),
        "off" | "disabled" | "none" => Ok(None),
        _ => text.parse().map(Some),
    }
}

fn parse_format_args(args: &str) -> Result<(FormatSlot, FormatTag)> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(slot), Some(tag)) => Ok((slot.parse()?, tag.parse()?)),
        _ => Err(BotError::validation(
            "usage: /format <body|prefix|suffix> <bold|italic|underline|strike|code|pre|spoiler|quote|plain>",
        )),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn set_or_removed(label: &str, set: bool) -> String {
    if set {
        format!("✅ {} set.", label)
    } else {
        format!("✅ {} removed.", label)
    }
}

pub(crate) fn cleared(scope: ClearScope) -> String {
    let label = match scope {
        ClearScope::Prefix => "Prefix",
        ClearScope::Suffix => "Suffix",
        ClearScope::Replacements => "Replacements",
        ClearScope::Style => "Style settings",
        ClearScope::Forwarding => "Forwarding",
        ClearScope::All => "All settings",
    };
    format!("✅ {} cleared successfully!", label)
}
