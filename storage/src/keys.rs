//! Key builders for the colon-namespaced key space.

pub const CHANNEL_PREFIX: &str = "channel:";
pub const USER_PREFIX: &str = "user:";
pub const PENDING_PREFIX: &str = "pending:";
pub const INVITE_PREFIX: &str = "invite:";
pub const MENU_MSG_PREFIX: &str = "menu_msg:";
pub const LAST_FORWARD_PREFIX: &str = "last_forward:";

/// Channel configuration record.
pub fn channel(channel_id: i64) -> String {
    format!("{CHANNEL_PREFIX}{channel_id}")
}

/// Linked channel of a user.
pub fn user(user_id: i64) -> String {
    format!("{USER_PREFIX}{user_id}")
}

pub fn pending(user_id: i64) -> String {
    format!("{PENDING_PREFIX}{user_id}")
}

/// Cached invite link; `kind` is `channel` or `group`.
pub fn invite(kind: &str) -> String {
    format!("{INVITE_PREFIX}{kind}")
}

pub fn menu_msg(user_id: i64) -> String {
    format!("{MENU_MSG_PREFIX}{user_id}")
}

pub fn last_forward(channel_id: i64) -> String {
    format!("{LAST_FORWARD_PREFIX}{channel_id}")
}

/// Extracts the user id from a `user:<id>` key.
pub fn parse_user_key(key: &str) -> Option<i64> {
    key.strip_prefix(USER_PREFIX)?.parse().ok()
}
