//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render pieces of the Chat Screen from signals handed down by
//! the page; they never own connection state themselves.

pub mod connection_notice;
pub mod message_list;
