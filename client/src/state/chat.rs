//! Chat-session state for one mounted Chat Screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! The connection task writes lifecycle transitions and inbound events here;
//! the Chat Screen reads it to pick notices, render the event list, and gate
//! sending. The state lives exactly as long as the screen that owns it.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::chat::ChatEvent;

/// Lifecycle of the single broker connection a Chat Screen opens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket opened, STOMP handshake not yet answered.
    #[default]
    Connecting,
    /// Broker answered `CONNECTED`; the topic subscription is live.
    Connected,
    /// Handshake failed or the broker dropped the session. Terminal.
    Failed,
}

/// Chat-session state: connection lifecycle plus the received event log.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub connection: ConnectionState,
    /// Events in arrival order. Append-only.
    pub events: Vec<ChatEvent>,
    /// Inbound payloads dropped because they failed validation.
    pub rejected: usize,
}

impl ChatState {
    /// `Connecting -> Connected`. Returns `false` if not currently connecting.
    pub fn mark_connected(&mut self) -> bool {
        if self.connection != ConnectionState::Connecting {
            return false;
        }
        self.connection = ConnectionState::Connected;
        true
    }

    /// Move to `Failed` from any live state. Returns `false` if already failed.
    pub fn mark_failed(&mut self) -> bool {
        if self.connection == ConnectionState::Failed {
            return false;
        }
        self.connection = ConnectionState::Failed;
        true
    }

    pub fn push_event(&mut self, event: ChatEvent) {
        self.events.push(event);
    }

    pub fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    /// Whether outbound chat messages may be published.
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.connection == ConnectionState::Connected
    }
}
