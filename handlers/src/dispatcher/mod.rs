//! Update Dispatcher: routes one webhook update to exactly one branch.

mod callback_query;
mod channel_post;
mod private;

pub use callback_query::handle_callback_query;
pub use channel_post::handle_channel_post;
pub use private::handle_private_message;

use capbot_core::{route, Result, Route, Update};
use tracing::{debug, info, instrument};

use crate::context::RequestContext;

/// Handles one update to completion. User input errors are answered in chat and never
/// surface here; remote and storage failures do.
#[instrument(skip(ctx, update), fields(update_id = update.id.0))]
pub async fn dispatch(ctx: &RequestContext, update: &Update) -> Result<()> {
    match route(update) {
        Route::ChannelPost(post) => {
            info!(channel_id = post.chat.id.0, "step: dispatch channel post");
            handle_channel_post(ctx, post).await
        }
        Route::PrivateMessage(message) => {
            info!(chat_id = message.chat.id.0, "step: dispatch private message");
            handle_private_message(ctx, message).await
        }
        Route::CallbackQuery(query) => {
            info!(user_id = query.from.id.0, "step: dispatch callback query");
            handle_callback_query(ctx, query).await
        }
        Route::Other => {
            debug!("step: update of no interest, acknowledged");
            Ok(())
        }
    }
}
