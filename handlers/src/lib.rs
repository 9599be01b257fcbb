//! # Handlers for capbot
//!
//! Everything that reacts to an update: the channel config manager, user links, pending
//! replies, the subscription gate, inline menus and the dispatcher tying them together.
//! All state goes through the [`storage::KvStore`] in [`RequestContext`].

pub mod broadcast;
pub mod callback;
pub mod commands;
mod context;
pub mod dispatcher;
pub mod gate;
mod links;
mod manager;
pub mod menu;
pub mod pending;
pub mod render;

#[cfg(test)]
mod test;

pub use broadcast::{broadcast, user_count, BroadcastReport};
pub use callback::CallbackAction;
pub use commands::Command;
pub use context::{BotSettings, RequestContext};
pub use dispatcher::dispatch;
pub use gate::{is_subscribed, resolve_invite_link, GateKind, MembershipCheck};
pub use links::{parse_channel_id, UserLinks};
pub use manager::{parse_replacement_pair, parse_rule_number, ChannelConfigManager};
pub use menu::MenuView;
pub use pending::{PendingAction, PendingKind, PendingStore, PENDING_TTL};
