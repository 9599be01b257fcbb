//! Putting a [`MenuView`] on screen while keeping one live menu message per user.

use capbot_core::Result;
use storage::{keys, PutOptions};
use teloxide::types::{ChatId, MessageId};
use tracing::{debug, warn};

use crate::context::{swallow, RequestContext};
use crate::menu::MenuView;

/// `menu_msg:<user>` holds the id of the user's current menu message.
pub async fn tracked_menu(ctx: &RequestContext, user_id: i64) -> Result<Option<i64>> {
    let raw = ctx.store.get(&keys::menu_msg(user_id)).await?;
    Ok(raw.and_then(|v| v.parse().ok()))
}

pub async fn track_menu(ctx: &RequestContext, user_id: i64, message_id: i64) -> Result<()> {
    ctx.store
        .put(
            &keys::menu_msg(user_id),
            &message_id.to_string(),
            PutOptions::default(),
        )
        .await?;
    Ok(())
}

/// Shows `view` in the private chat of `user_id`.
///
/// With `existing`, that message is edited in place; an edit rejected as "not modified"
/// counts as shown. Any other edit failure, or no `existing`, deletes the tracked menu
/// and sends a fresh one.
pub async fn show_menu(
    ctx: &RequestContext,
    user_id: i64,
    existing: Option<i64>,
    view: &MenuView,
) -> Result<()> {
    let chat = ChatId(user_id);

    if let Some(message_id) = existing {
        let edit = ctx.api.edit_message_text(
            chat,
            MessageId(message_id as i32),
            &view.text,
            view.keyboard.clone(),
        );
        match edit.await {
            Ok(()) => return track_menu(ctx, user_id, message_id).await,
            Err(e) if e.is_not_modified() => {
                debug!(user_id, message_id, "Menu unchanged");
                return track_menu(ctx, user_id, message_id).await;
            }
            Err(e) => {
                warn!(user_id, message_id, error = %e, "Menu edit failed, sending a new one");
            }
        }
    }

    if let Some(old) = tracked_menu(ctx, user_id).await? {
        let delete = ctx.api.delete_message(chat, MessageId(old as i32));
        swallow(delete.await, "delete old menu");
    }

    let send = ctx
        .api
        .send_message(chat, &view.text, Some(view.keyboard.clone()));
    match swallow(send.await, "send menu") {
        Some(sent) => track_menu(ctx, user_id, i64::from(sent.0)).await,
        None => Ok(()),
    }
}

/// Plain HTML reply without a keyboard. Failures are logged only.
pub async fn reply(ctx: &RequestContext, chat_id: i64, text: impl Into<String>) {
    let text = text.into();
    swallow(ctx.api.send_message(ChatId(chat_id), &text, None).await, "reply");
}
