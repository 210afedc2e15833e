//! Running list of room events for the Chat Screen.
//!
//! JOIN/LEAVE render as centered system notices; CHAT renders as a bubble
//! with a colored avatar. The list scrolls to the newest entry whenever the
//! event log grows.

#[cfg(test)]
#[path = "message_list_test.rs"]
mod message_list_test;

use frames::chat::{ChatEvent, EventKind};
use leptos::prelude::*;

use crate::state::chat::ChatState;
use crate::util::color::{avatar_glyph, color_for};

/// View model for one list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Notice(String),
    Bubble {
        avatar: String,
        color: &'static str,
        sender: String,
        body: String,
    },
}

pub fn entry_for(event: &ChatEvent) -> Entry {
    match event.kind {
        EventKind::Join => Entry::Notice(format!("{} joined!", event.sender)),
        EventKind::Leave => Entry::Notice(format!("{} left!", event.sender)),
        EventKind::Chat => Entry::Bubble {
            avatar: avatar_glyph(&event.sender),
            color: color_for(&event.sender),
            sender: event.sender.clone(),
            body: event.content.clone().unwrap_or_default(),
        },
    }
}

/// Entry for the event at `index`, if it has arrived.
pub fn entry_at(events: &[ChatEvent], index: usize) -> Option<Entry> {
    events.get(index).map(entry_for)
}

/// Event list keyed by arrival index; the log is append-only, so each
/// arrival renders one new `<li>` and leaves the rest in place.
#[component]
pub fn MessageList(#[prop(into)] chat: Signal<ChatState>) -> impl IntoView {
    let list_ref = NodeRef::<leptos::html::Ul>::new();
    let count = Memo::new(move |_| chat.with(|c| c.events.len()));

    Effect::new(move || {
        let _ = count.get();

        #[cfg(feature = "csr")]
        {
            if let Some(el) = list_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    view! {
        <ul id="messageArea" node_ref=list_ref>
            <For
                each=move || 0..count.get()
                key=|index| *index
                children=move |index| match chat.with_untracked(|c| entry_at(&c.events, index)) {
                    Some(Entry::Notice(text)) => view! {
                        <li class="event-message">
                            <p>{text}</p>
                        </li>
                    }
                        .into_any(),
                    Some(Entry::Bubble { avatar, color, sender, body }) => view! {
                        <li class="chat-message">
                            <i style:background-color=color>{avatar}</i>
                            <span>{sender}</span>
                            <p>{body}</p>
                        </li>
                    }
                        .into_any(),
                    None => ().into_any(),
                }
            />
        </ul>
    }
}
