//! Duplicate-suppression fingerprint for channel posts.

use teloxide::types::Message;

use crate::types::MessageExt;

/// Order-sensitive 32-bit string hash (`h = h * 31 + unit` over UTF-16 code units, wrapping).
fn string_hash(content: &str) -> i32 {
    content
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Fingerprint of a post: caption followed by the unique ids of its first photo size,
/// video and document. Returned as a decimal string, the form stored under
/// `last_forward:<channel>`. Not a cryptographic digest.
pub fn content_fingerprint(message: &Message) -> String {
    let mut content = message.caption().unwrap_or_default().to_string();
    if let Some(photo) = message.first_photo() {
        content.push_str(&photo.file.unique_id.0);
    }
    if let Some(video) = message.video() {
        content.push_str(&video.file.unique_id.0);
    }
    if let Some(document) = message.document() {
        content.push_str(&document.file.unique_id.0);
    }
    string_hash(&content).to_string()
}
