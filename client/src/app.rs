//! Root application component: the Identity Screen until a name is chosen,
//! then the Chat Screen for that name.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::net::endpoint::ClientConfig;
use crate::pages::{chat::ChatPage, identity::IdentityPage};

/// Which screen the app is showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Identity,
    Chat(String),
}

impl Screen {
    /// Hand control to the Chat Screen. Only the first name is accepted;
    /// the name is fixed for the rest of the session.
    pub fn enter(&mut self, display_name: String) -> bool {
        if *self != Self::Identity {
            return false;
        }
        *self = Self::Chat(display_name);
        true
    }
}

/// Root application component.
///
/// Provides the client configuration and switches between the two screens.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ClientConfig::from_build_env());

    let screen = RwSignal::new(Screen::default());
    let on_enter = Callback::new(move |name: String| {
        screen.maybe_update(|s| s.enter(name));
    });

    view! {
        <Title text="BChat"/>
        {move || match screen.get() {
            Screen::Identity => view! { <IdentityPage on_enter=on_enter/> }.into_any(),
            Screen::Chat(display_name) => view! { <ChatPage display_name=display_name/> }.into_any(),
        }}
    }
}
