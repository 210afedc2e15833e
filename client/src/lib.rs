//! # bchat-web
//!
//! Leptos + WASM group chat client. A display name is picked on the identity
//! screen, then the chat screen joins a single broadcast room on a STOMP
//! broker over WebSocket.
//!
//! This crate contains pages, components, chat-session state, and the
//! connection task. The wire format lives in the `frames` crate.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Install browser logging and mount the app on `<body>`.
#[cfg(feature = "csr")]
pub fn mount() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    leptos::mount::mount_to_body(app::App);
}
