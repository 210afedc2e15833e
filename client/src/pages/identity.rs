//! Identity screen: pick a display name before entering the room.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use leptos::prelude::*;

/// Trimmed display name, or `None` when nothing but whitespace was typed.
pub fn normalize_display_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty()).then(|| name.to_owned())
}

/// Name entry form. Calls `on_enter` with the trimmed name on a non-blank
/// submit; blank submits are ignored without feedback.
#[component]
pub fn IdentityPage(on_enter: Callback<String>) -> impl IntoView {
    let username = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(name) = normalize_display_name(&username.get_untracked()) {
            on_enter.run(name);
        }
    };

    view! {
        <div id="username-page">
            <div class="username-page-container">
                <h2 class="title">"Type your username to enter the Chatroom"</h2>
                <form id="usernameForm" name="usernameForm" on:submit=on_submit>
                    <div class="form-group">
                        <input
                            type="text"
                            id="name"
                            placeholder="Username"
                            autocomplete="off"
                            class="form-control"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <button type="submit" class="accent username-submit">
                            "Start Chatting"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
