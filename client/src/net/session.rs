//! Outbound side of a chat session.
//!
//! `ChatSession` is the Chat Screen's handle on its connection task: chat
//! messages are queued on an unbounded channel that the task drains into the
//! socket, and closing the channel is the teardown signal.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::Frame;
use frames::chat::chat_frame;
use futures::channel::mpsc::UnboundedSender;

use crate::state::chat::ConnectionState;

/// Channel feeding frames to the connection task.
pub type FrameSender = UnboundedSender<Frame>;

/// Result of a send attempt from the message form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// One CHAT frame was queued.
    Sent,
    /// The trimmed text was empty; nothing was queued.
    Empty,
    /// The handshake has not succeeded (or the session failed).
    NotConnected,
    /// The connection task is gone.
    Closed,
}

impl SendOutcome {
    /// Only a queued message clears the input field.
    #[must_use]
    pub fn clears_input(self) -> bool {
        self == Self::Sent
    }
}

/// Handle owned by one Chat Screen for the lifetime of its connection.
#[derive(Clone, Debug)]
pub struct ChatSession {
    display_name: String,
    outbound: FrameSender,
}

impl ChatSession {
    #[must_use]
    pub fn new(display_name: String, outbound: FrameSender) -> Self {
        Self { display_name, outbound }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Publish `text` as a CHAT event if it is non-blank and the session is
    /// connected. The published content is the trimmed text.
    pub fn send_chat(&self, connection: ConnectionState, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Empty;
        }
        if connection != ConnectionState::Connected {
            return SendOutcome::NotConnected;
        }
        if self
            .outbound
            .unbounded_send(chat_frame(&self.display_name, content))
            .is_err()
        {
            return SendOutcome::Closed;
        }
        SendOutcome::Sent
    }

    /// Close the connection. Returns `true` only for the call that closed it.
    pub fn close(&self) -> bool {
        if self.outbound.is_closed() {
            return false;
        }
        self.outbound.close_channel();
        true
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}
