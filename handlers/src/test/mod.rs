//! Unit test module
//!
//! Store-backed unit tests for the manager, user links and pending replies.
//! Everything runs against the in-memory KV store; Telegram is not involved.

mod manager_test;
