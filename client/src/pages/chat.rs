//! Chat Screen: one broker connection, the room's event log, and the
//! message form.
//!
//! ARCHITECTURE
//! ============
//! Mounting the page creates a fresh `ChatState` (always `Connecting`) and
//! spawns the connection task. The page keeps a `ChatSession` for
//! publishing; cleanup closes that session, which tears the connection down
//! whatever state it reached.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use leptos::prelude::*;

use crate::components::connection_notice::ConnectionNotice;
use crate::components::message_list::MessageList;
use crate::net::endpoint::ClientConfig;
use crate::net::session::{ChatSession, SendOutcome};
use crate::state::chat::ChatState;

/// Apply a form submit: publish through `session` and clear `input` only
/// when a message actually went out.
pub fn submit_message(session: &ChatSession, chat: &ChatState, input: &mut String) -> SendOutcome {
    let outcome = session.send_chat(chat.connection, input);
    if outcome.clears_input() {
        input.clear();
    }
    outcome
}

#[component]
pub fn ChatPage(display_name: String) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let chat = RwSignal::new(ChatState::default());
    let input = RwSignal::new(String::new());

    let session = open_session(&config, display_name, chat);
    let teardown = session.clone();
    on_cleanup(move || {
        if teardown.close() {
            leptos::logging::log!("chat session closed by {}", teardown.display_name());
        }
    });
    let session = StoredValue::new(session);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut text = input.get_untracked();
        let outcome = session.with_value(|s| chat.with_untracked(|c| submit_message(s, c, &mut text)));
        match outcome {
            SendOutcome::Sent => input.set(text),
            SendOutcome::Closed => leptos::logging::warn!("chat message dropped: connection closed"),
            SendOutcome::Empty | SendOutcome::NotConnected => {}
        }
    };

    let connection = Signal::derive(move || chat.with(|c| c.connection));

    view! {
        <div id="chat-page">
            <div class="chat-container">
                <div class="chat-header">
                    <h2>"BChat"</h2>
                </div>
                <ConnectionNotice state=connection/>
                <MessageList chat=chat/>
                <form id="messageForm" name="messageForm" on:submit=on_submit>
                    <div class="form-group">
                        <div class="input-group clearfix">
                            <input
                                type="text"
                                id="message"
                                placeholder="Type a message..."
                                autocomplete="off"
                                class="form-control"
                                prop:value=move || input.get()
                                on:input=move |ev| input.set(event_target_value(&ev))
                            />
                            <button type="submit" class="primary" disabled=move || !chat.with(ChatState::can_send)>
                                "Send"
                            </button>
                        </div>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[cfg(feature = "csr")]
fn open_session(config: &ClientConfig, display_name: String, chat: RwSignal<ChatState>) -> ChatSession {
    let location = crate::net::endpoint::page_location();
    let url = config.websocket_url(&location.protocol, &location.host);
    leptos::logging::log!("connecting to {url} as {display_name}");
    let outbound = crate::net::stomp_client::spawn_stomp_client(url, location.hostname, display_name.clone(), chat);
    ChatSession::new(display_name, outbound)
}

#[cfg(not(feature = "csr"))]
fn open_session(_config: &ClientConfig, display_name: String, _chat: RwSignal<ChatState>) -> ChatSession {
    // No browser socket outside csr builds; the screen still renders.
    let (outbound, _) = futures::channel::mpsc::unbounded();
    ChatSession::new(display_name, outbound)
}
