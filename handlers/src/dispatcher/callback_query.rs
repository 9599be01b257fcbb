//! Inline button presses. Always acknowledged, then rendered in place.

use capbot_core::{BotError, CallbackQuery, ChannelConfig, Result};
use tracing::{debug, info, instrument};

use crate::callback::CallbackAction;
use crate::context::{swallow, RequestContext};
use crate::dispatcher::private::{cleared, user_text};
use crate::gate::{is_subscribed, join_links};
use crate::menu::{self, MenuView};
use crate::pending::{PendingAction, PendingKind};
use crate::render::{show_menu, tracked_menu};

#[instrument(skip(ctx, query), fields(user_id = query.from.id.0))]
pub async fn handle_callback_query(ctx: &RequestContext, query: &CallbackQuery) -> Result<()> {
    swallow(ctx.api.answer_callback_query(query).await, "answer callback");

    let user_id = query.from.id.0 as i64;
    let existing = query.message.as_ref().map(|m| i64::from(m.id().0));
    let action = CallbackAction::decode(query.data.as_deref().unwrap_or_default());
    info!(action = %action, "step: callback decoded");

    let view = match run_action(ctx, user_id, &action).await {
        Ok(Some(view)) => view,
        Ok(None) => return Ok(()),
        // Rule lookups are handled per action; what is left is a missing channel link.
        Err(BotError::NotFound(_)) => menu::link_first(),
        Err(e) if e.is_user_facing() => menu::notice(
            format!("❌ {}", user_text(&e)),
            "⬅️ Menu",
            CallbackAction::MainMenu,
        ),
        Err(e) => return Err(e),
    };
    show_menu(ctx, user_id, existing, &view).await?;

    // The prompt is on screen now; its id is where the answer gets rendered.
    if let CallbackAction::Prompt(kind) = action {
        if let Some(prompt_message_id) = tracked_menu(ctx, user_id).await? {
            let pending = PendingAction {
                action: kind,
                prompt_message_id,
            };
            ctx.pending().set(user_id, pending).await?;
        }
    }
    Ok(())
}

async fn linked_config(ctx: &RequestContext, user_id: i64) -> Result<(i64, ChannelConfig)> {
    let channel = ctx.links().require_channel(user_id).await?;
    let config = ctx.configs().load(channel).await?;
    Ok((channel, config))
}

async fn settings(ctx: &RequestContext, channel: i64) -> Result<MenuView> {
    let config = ctx.configs().load(channel).await?;
    Ok(menu::settings_view(Some(channel), &config))
}

/// `None` when nothing should be rendered.
async fn run_action(
    ctx: &RequestContext,
    user_id: i64,
    action: &CallbackAction,
) -> Result<Option<MenuView>> {
    let configs = ctx.configs();
    let view = match action {
        CallbackAction::MainMenu => {
            // Also the cancel button of every prompt.
            ctx.pending().take(user_id).await?;
            menu::main_menu()
        }
        CallbackAction::EditMenu => menu::edit_menu(),
        CallbackAction::CheckJoined => {
            if ctx.is_owner(user_id) || is_subscribed(ctx, user_id).await {
                info!(user_id, "step: subscription confirmed");
                menu::main_menu()
            } else {
                let (channel, group) = join_links(ctx).await;
                menu::join_prompt(&channel, &group, true)
            }
        }
        CallbackAction::ViewSettings => {
            let channel = ctx.links().linked_channel(user_id).await?;
            let config = match channel {
                Some(id) => configs.load(id).await?,
                None => ChannelConfig::default(),
            };
            menu::settings_view(channel, &config)
        }
        CallbackAction::FormatMenu => {
            let (_, config) = linked_config(ctx, user_id).await?;
            menu::format_menu(&config)
        }
        CallbackAction::Prompt(kind) => {
            if kind.needs_channel() {
                ctx.links().require_channel(user_id).await?;
            }
            menu::prompt_view(*kind)
        }
        CallbackAction::Clear(scope) => {
            let channel = ctx.links().require_channel(user_id).await?;
            configs.clear(channel, *scope).await?;
            menu::notice(cleared(*scope), "⬅️ Menu", CallbackAction::MainMenu)
        }
        CallbackAction::ToggleReplacement(index) => {
            let channel = ctx.links().require_channel(user_id).await?;
            match configs.toggle_replacement(channel, *index).await {
                Ok(_) => settings(ctx, channel).await?,
                Err(BotError::NotFound(_)) => replacement_not_found(),
                Err(e) => return Err(e),
            }
        }
        CallbackAction::DeleteReplacement(index) => {
            let channel = ctx.links().require_channel(user_id).await?;
            match configs.remove_replacement(channel, *index).await {
                Ok(removed) => {
                    debug!(index, from = %removed.from, "step: replacement deleted");
                    settings(ctx, channel).await?
                }
                Err(BotError::NotFound(_)) => replacement_not_found(),
                Err(e) => return Err(e),
            }
        }
        CallbackAction::ToggleReplacements => {
            let channel = ctx.links().require_channel(user_id).await?;
            configs.toggle_replacements_enabled(channel).await?;
            settings(ctx, channel).await?
        }
        CallbackAction::ToggleStyle => {
            let channel = ctx.links().require_channel(user_id).await?;
            configs.toggle_style(channel).await?;
            settings(ctx, channel).await?
        }
        CallbackAction::ToggleForwarding => {
            let channel = ctx.links().require_channel(user_id).await?;
            match configs.toggle_forwarding(channel).await {
                Ok(_) => settings(ctx, channel).await?,
                Err(e @ BotError::Validation(_)) => menu::notice(
                    format!("❌ {}", user_text(&e)),
                    "➡️ Set Forwarding",
                    CallbackAction::Prompt(PendingKind::Forward),
                ),
                Err(e) => return Err(e),
            }
        }
        CallbackAction::CycleFormat(slot) => {
            let channel = ctx.links().require_channel(user_id).await?;
            let tag = configs.cycle_format(channel, *slot).await?;
            debug!(slot = ?slot, tag = %tag, "step: format cycled");
            let config = configs.load(channel).await?;
            menu::format_menu(&config)
        }
        CallbackAction::Unknown(data) => {
            debug!(data = %data, "step: unknown callback data, ignoring");
            return Ok(None);
        }
    };
    Ok(Some(view))
}

fn replacement_not_found() -> MenuView {
    menu::notice(
        "❌ Replacement not found!",
        "🔍 View Settings",
        CallbackAction::ViewSettings,
    )
}
