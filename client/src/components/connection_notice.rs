//! Connection status banner for the Chat Screen.

#[cfg(test)]
#[path = "connection_notice_test.rs"]
mod connection_notice_test;

use leptos::prelude::*;

use crate::state::chat::ConnectionState;

pub const CONNECTING_TEXT: &str = "Connecting...";
pub const FAILED_TEXT: &str = "Could not connect to WebSocket server. Please refresh this page to try again!";

/// Banner content for a connection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub is_error: bool,
}

/// At most one notice per state; a live session shows none.
pub fn notice_for(state: ConnectionState) -> Option<Notice> {
    match state {
        ConnectionState::Connecting => Some(Notice { text: CONNECTING_TEXT, is_error: false }),
        ConnectionState::Failed => Some(Notice { text: FAILED_TEXT, is_error: true }),
        ConnectionState::Connected => None,
    }
}

#[component]
pub fn ConnectionNotice(#[prop(into)] state: Signal<ConnectionState>) -> impl IntoView {
    move || {
        notice_for(state.get()).map(|notice| {
            view! {
                <div class="connecting" class:failed=notice.is_error>
                    {notice.text}
                </div>
            }
        })
    }
}
