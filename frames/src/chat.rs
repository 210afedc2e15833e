//! Chat event schema and the fixed broker destinations.
//!
//! Events travel as JSON bodies: `{"sender": "...", "type": "CHAT", "content": "..."}`.
//! Inbound bodies go through [`decode_event`], which validates the shape so a
//! bad payload is an ordinary error rather than a broken session.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use serde::{Deserialize, Serialize};

use crate::{Command, Frame};

/// Broadcast topic every participant subscribes to.
pub const TOPIC_PUBLIC: &str = "/topic/public";
/// Destination announcing a new participant.
pub const ADD_USER_DESTINATION: &str = "/app/chat.addUser";
/// Destination broadcasting a chat message.
pub const SEND_MESSAGE_DESTINATION: &str = "/app/chat.sendMessage";
/// Id of the single topic subscription a session holds.
pub const SUBSCRIPTION_ID: &str = "sub-0";

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The body was not a JSON event object.
    #[error("invalid event payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The sender was missing or blank.
    #[error("event has an empty sender")]
    EmptySender,
    /// A `CHAT` event arrived without content.
    #[error("chat event from {0} has no content")]
    MissingContent(String),
}

/// Kind of chat event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Join,
    Leave,
    Chat,
}

/// One entry in the room's event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Display name of the participant the event is about.
    pub sender: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Message body; only meaningful for [`EventKind::Chat`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatEvent {
    /// A `JOIN` announcement for `sender`.
    #[must_use]
    pub fn join(sender: impl Into<String>) -> Self {
        Self { sender: sender.into(), kind: EventKind::Join, content: None }
    }

    /// A `LEAVE` notice for `sender`.
    #[must_use]
    pub fn leave(sender: impl Into<String>) -> Self {
        Self { sender: sender.into(), kind: EventKind::Leave, content: None }
    }

    /// A `CHAT` message from `sender`.
    #[must_use]
    pub fn chat(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self { sender: sender.into(), kind: EventKind::Chat, content: Some(content.into()) }
    }

    /// JSON body for this event.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serializing a struct of strings and a unit enum cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Decode and validate an event body.
///
/// # Errors
///
/// Returns [`EventError::Json`] for malformed JSON or an unknown `type`,
/// [`EventError::EmptySender`] for a blank sender, and
/// [`EventError::MissingContent`] for a `CHAT` event without content.
pub fn decode_event(body: &str) -> Result<ChatEvent, EventError> {
    let event = serde_json::from_str::<ChatEvent>(body)?;
    if event.sender.trim().is_empty() {
        return Err(EventError::EmptySender);
    }
    if event.kind == EventKind::Chat && event.content.is_none() {
        return Err(EventError::MissingContent(event.sender));
    }
    Ok(event)
}

/// Credential-less `CONNECT` frame for the given virtual host.
#[must_use]
pub fn connect_frame(host: &str) -> Frame {
    Frame::new(Command::Connect)
        .with_header("accept-version", "1.1,1.2")
        .with_header("host", host)
        .with_header("heart-beat", "0,0")
}

/// `SUBSCRIBE` to the broadcast topic.
#[must_use]
pub fn subscribe_frame() -> Frame {
    Frame::new(Command::Subscribe)
        .with_header("id", SUBSCRIPTION_ID)
        .with_header("destination", TOPIC_PUBLIC)
}

/// `SEND` announcing `sender` to the room.
#[must_use]
pub fn join_frame(sender: &str) -> Frame {
    event_frame(ADD_USER_DESTINATION, &ChatEvent::join(sender))
}

/// `SEND` broadcasting one chat message.
#[must_use]
pub fn chat_frame(sender: &str, content: &str) -> Frame {
    event_frame(SEND_MESSAGE_DESTINATION, &ChatEvent::chat(sender, content))
}

/// `DISCONNECT` sent before closing the socket.
#[must_use]
pub fn disconnect_frame() -> Frame {
    Frame::new(Command::Disconnect)
}

fn event_frame(destination: &str, event: &ChatEvent) -> Frame {
    Frame::new(Command::Send)
        .with_header("destination", destination)
        .with_header("content-type", "application/json")
        .with_body(event.to_json())
}
