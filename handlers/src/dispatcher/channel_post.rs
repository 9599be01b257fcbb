//! Channel posts: rewrite the caption in place, then forward once per distinct post.

use capbot_core::{content_fingerprint, transform, ChannelConfig, Message, MessageExt, Result};
use capbot_telegram::MediaKind;
use storage::{keys, PutOptions};
use teloxide::types::FileId;
use tracing::{debug, info, instrument};

use crate::context::{swallow, RequestContext};

#[instrument(skip(ctx, post), fields(channel_id = post.chat.id.0, message_id = post.id.0))]
pub async fn handle_channel_post(ctx: &RequestContext, post: &Message) -> Result<()> {
    if post.caption().is_none() && !post.has_media() {
        debug!("step: channel post without caption or media, skip");
        return Ok(());
    }

    let channel_id = post.chat.id.0;
    let config = ctx.configs().load(channel_id).await?;
    let original = post.caption().unwrap_or_default();
    let caption = transform(original, &config);
    info!(
        original_len = original.len(),
        new_len = caption.len(),
        "step: caption transformed"
    );

    if caption != original {
        let edit = ctx.api.edit_message_caption(post.chat.id, post.id, &caption);
        if swallow(edit.await, "edit caption").is_some() {
            info!("step: caption edited");
        }
    }

    forward_post(ctx, post, &config, &caption).await
}

/// Sends the post to the forward target unless it repeats the last forwarded one.
async fn forward_post(
    ctx: &RequestContext,
    post: &Message,
    config: &ChannelConfig,
    caption: &str,
) -> Result<()> {
    let Some(target) = config.forward.target() else {
        return Ok(());
    };

    let channel_id = post.chat.id.0;
    let key = keys::last_forward(channel_id);
    let fingerprint = content_fingerprint(post);
    if ctx.store.get(&key).await?.as_deref() == Some(fingerprint.as_str()) {
        info!(fingerprint = %fingerprint, "step: duplicate post, not forwarding");
        return Ok(());
    }

    let caption = (!caption.is_empty()).then_some(caption);
    let forwarded = match media_of(post) {
        Some((kind, file_id)) => {
            let send = ctx.api.send_media(target.recipient(), kind, file_id, caption);
            swallow(send.await, kind.method()).is_some()
        }
        None => {
            let copy = ctx
                .api
                .copy_message(target.recipient(), post.chat.id, post.id, caption);
            swallow(copy.await, "copyMessage").is_some()
        }
    };

    if forwarded {
        ctx.store.put(&key, &fingerprint, PutOptions::default()).await?;
        info!(target = %target, "step: post forwarded");
    }
    Ok(())
}

/// Largest photo, else video, else document.
fn media_of(post: &Message) -> Option<(MediaKind, FileId)> {
    if let Some(photo) = post.largest_photo() {
        return Some((MediaKind::Photo, photo.file.id.clone()));
    }
    if let Some(video) = post.video() {
        return Some((MediaKind::Video, video.file.id.clone()));
    }
    post.document()
        .map(|d| (MediaKind::Document, d.file.id.clone()))
}
