//! STOMP-over-WebSocket connection task for the Chat Screen.
//!
//! One task per mounted Chat Screen opens the socket, performs the
//! credential-less STOMP handshake, subscribes to the broadcast topic,
//! announces the join, and then pumps frames both ways until either the
//! broker goes away or the screen closes its [`FrameSender`].
//!
//! Only the gloo-net socket adapter is gated behind `#[cfg(feature = "csr")]`.
//! The session itself runs over any `Sink<Frame>` and any stream of text
//! messages, so the whole handshake and pump can be driven natively.
//!
//! ERROR HANDLING
//! ==============
//! There is exactly one connection attempt. Any failure before or during the
//! handshake, and any drop of an established session that the screen did not
//! ask for, ends in `ConnectionState::Failed`. Undecodable inbound payloads
//! are logged and counted but never end the session.

#[cfg(test)]
#[path = "stomp_client_test.rs"]
mod stomp_client_test;

#[cfg(any(test, feature = "csr"))]
use std::collections::VecDeque;

use frames::chat::EventError;
use frames::{CodecError, Command};

#[cfg(any(test, feature = "csr"))]
use frames::Frame;
#[cfg(any(test, feature = "csr"))]
use frames::chat::{SUBSCRIPTION_ID, decode_event};
#[cfg(any(test, feature = "csr"))]
use futures::channel::mpsc::UnboundedReceiver;
#[cfg(any(test, feature = "csr"))]
use futures::{Sink, SinkExt, Stream, StreamExt};

#[cfg(any(test, feature = "csr"))]
use crate::net::session::FrameSender;
#[cfg(any(test, feature = "csr"))]
use crate::state::chat::ChatState;

/// Why a connection ended in `Failed`.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The browser refused to open the socket.
    #[error("failed to open websocket: {0}")]
    Open(String),
    /// The socket errored while reading or writing.
    #[error("websocket transport error: {0}")]
    Transport(String),
    /// The socket closed without the screen asking for it.
    #[error("websocket closed")]
    Closed,
    /// The broker answered the handshake with an `ERROR` frame.
    #[error("broker rejected connection: {0}")]
    Rejected(String),
    /// The broker answered the handshake with something other than `CONNECTED`.
    #[error("unexpected {0} frame during handshake")]
    Unexpected(Command),
    #[error("undecodable frame: {0}")]
    Codec(#[from] CodecError),
}

/// What applying one inbound frame did to the chat state.
#[derive(Debug)]
pub enum Inbound {
    /// A valid event was appended.
    Appended,
    /// The payload failed validation and was dropped.
    Rejected(EventError),
    /// The broker reported an error; the session is now failed.
    BrokerError(String),
    /// Nothing for this screen (receipts, other subscriptions).
    Ignored,
}

/// Decide the handshake from the broker's first frame.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn handshake_outcome(frame: &Frame) -> Result<(), ConnectionError> {
    match frame.command {
        Command::Connected => Ok(()),
        Command::Error => Err(ConnectionError::Rejected(error_message(frame))),
        other => Err(ConnectionError::Unexpected(other)),
    }
}

/// Apply one post-handshake frame to the chat state.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn apply_inbound(frame: &Frame, chat: &mut ChatState) -> Inbound {
    match frame.command {
        Command::Message => {
            if frame
                .header("subscription")
                .is_some_and(|id| id != SUBSCRIPTION_ID)
            {
                return Inbound::Ignored;
            }
            match decode_event(&frame.body) {
                Ok(event) => {
                    chat.push_event(event);
                    Inbound::Appended
                }
                Err(err) => {
                    chat.record_rejected();
                    Inbound::Rejected(err)
                }
            }
        }
        Command::Error => {
            chat.mark_failed();
            Inbound::BrokerError(error_message(frame))
        }
        _ => Inbound::Ignored,
    }
}

/// Human-readable reason carried by an `ERROR` frame.
#[cfg(any(test, feature = "csr"))]
fn error_message(frame: &Frame) -> String {
    frame
        .header("message")
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| {
            let body = frame.body.trim();
            (!body.is_empty()).then(|| body.to_owned())
        })
        .unwrap_or_else(|| "no reason given".to_owned())
}

/// Where the session task writes connection state.
#[cfg(any(test, feature = "csr"))]
pub(crate) trait ChatStore {
    /// Mutate the state; `None` once the owner has been disposed.
    fn apply<T>(&self, f: impl FnOnce(&mut ChatState) -> T) -> Option<T>;
}

#[cfg(feature = "csr")]
impl ChatStore for leptos::prelude::RwSignal<ChatState> {
    fn apply<T>(&self, f: impl FnOnce(&mut ChatState) -> T) -> Option<T> {
        use leptos::prelude::Update;

        self.try_update(f)
    }
}

/// Spawn the connection task for one Chat Screen.
///
/// Returns the sender the screen publishes through; closing it tears the
/// connection down.
#[cfg(feature = "csr")]
pub fn spawn_stomp_client(
    url: String,
    host: String,
    display_name: String,
    chat: leptos::prelude::RwSignal<ChatState>,
) -> FrameSender {
    let (tx, rx) = futures::channel::mpsc::unbounded::<Frame>();
    let outbound = tx.clone();
    leptos::task::spawn_local(async move {
        match open_socket(&url) {
            Ok((ws_write, ws_read)) => {
                drive_session(ws_write, ws_read, &host, &display_name, &chat, &tx, rx).await;
            }
            Err(e) => {
                leptos::logging::warn!("chat connection failed: {e}");
                chat.apply(ChatState::mark_failed);
            }
        }
    });
    outbound
}

/// Open the browser socket and adapt it to frames out, text in.
#[cfg(feature = "csr")]
fn open_socket(
    url: &str,
) -> Result<
    (
        impl Sink<Frame, Error = ConnectionError> + Unpin,
        impl Stream<Item = Result<String, ConnectionError>> + Unpin,
    ),
    ConnectionError,
> {
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| ConnectionError::Open(e.to_string()))?;
    let (ws_write, ws_read) = ws.split();

    let ws_write = ws_write
        .sink_map_err(|e| ConnectionError::Transport(e.to_string()))
        .with(|frame: Frame| {
            futures::future::ready(Ok::<_, ConnectionError>(Message::Text(frames::encode_frame(&frame))))
        });
    let ws_read = ws_read.map(|msg| {
        msg.map(|msg| match msg {
            Message::Text(text) => text,
            Message::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        })
        .map_err(|e| ConnectionError::Transport(e.to_string()))
    });
    Ok((ws_write, ws_read))
}

/// Run one session to completion, leaving `Failed` behind on any error.
#[cfg(any(test, feature = "csr"))]
pub(crate) async fn drive_session<W, R, S>(
    ws_write: W,
    ws_read: R,
    host: &str,
    display_name: &str,
    chat: &S,
    tx: &FrameSender,
    rx: UnboundedReceiver<Frame>,
) where
    W: Sink<Frame, Error = ConnectionError> + Unpin,
    R: Stream<Item = Result<String, ConnectionError>> + Unpin,
    S: ChatStore,
{
    match run_session(ws_write, ws_read, host, display_name, chat, tx, rx).await {
        Ok(()) => {
            leptos::logging::log!("chat connection closed");
        }
        Err(e) => {
            leptos::logging::warn!("chat connection failed: {e}");
            chat.apply(ChatState::mark_failed);
        }
    }
}

/// Run one connection from handshake to close.
///
/// Returns `Ok(())` only when the screen closed the session.
#[cfg(any(test, feature = "csr"))]
async fn run_session<W, R, S>(
    mut ws_write: W,
    ws_read: R,
    host: &str,
    display_name: &str,
    chat: &S,
    tx: &FrameSender,
    mut rx: UnboundedReceiver<Frame>,
) -> Result<(), ConnectionError>
where
    W: Sink<Frame, Error = ConnectionError> + Unpin,
    R: Stream<Item = Result<String, ConnectionError>> + Unpin,
    S: ChatStore,
{
    use frames::chat::{connect_frame, join_frame, subscribe_frame};
    use futures::future::Either;

    let mut reader = FrameReader::new(ws_read);
    ws_write.send(connect_frame(host)).await?;

    // Wait for the broker's answer, unless the screen goes away first.
    let reply = loop {
        let handshake = Box::pin(reader.next_frame());
        match futures::future::select(handshake, rx.next()).await {
            Either::Left((reply, _)) => break Some(reply?),
            Either::Right((None, _)) => break None,
            Either::Right((Some(frame), _)) => {
                leptos::logging::warn!("dropping {} queued before connect", frame.command);
            }
        }
    };
    let Some(reply) = reply else {
        shutdown(ws_write).await;
        return Ok(());
    };
    handshake_outcome(&reply)?;
    if tx.is_closed() {
        shutdown(ws_write).await;
        return Ok(());
    }

    chat.apply(ChatState::mark_connected);
    ws_write.send(subscribe_frame()).await?;
    ws_write.send(join_frame(display_name)).await?;

    // Forward outgoing frames from the screen to the socket.
    let send_task = async {
        while let Some(frame) = rx.next().await {
            if let Err(e) = ws_write.send(frame).await {
                leptos::logging::warn!("chat publish failed: {e}");
                break;
            }
        }
    };

    // Apply incoming frames in delivery order.
    let recv_task = async {
        loop {
            match reader.next_frame().await {
                Ok(frame) => match chat.apply(|c| apply_inbound(&frame, c)) {
                    Some(Inbound::Rejected(e)) => leptos::logging::warn!("dropping chat payload: {e}"),
                    Some(Inbound::BrokerError(message)) => leptos::logging::warn!("broker error: {message}"),
                    _ => {}
                },
                Err(ConnectionError::Codec(e)) => {
                    leptos::logging::warn!("dropping undecodable frame: {e}");
                }
                Err(e) => {
                    leptos::logging::warn!("chat recv error: {e}");
                    break;
                }
            }
        }
    };

    let _ = futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    if tx.is_closed() {
        shutdown(ws_write).await;
        return Ok(());
    }
    Err(ConnectionError::Closed)
}

/// Splits socket messages into frames; one message may pack several.
#[cfg(any(test, feature = "csr"))]
struct FrameReader<R> {
    stream: R,
    pending: VecDeque<Frame>,
}

#[cfg(any(test, feature = "csr"))]
impl<R> FrameReader<R>
where
    R: Stream<Item = Result<String, ConnectionError>> + Unpin,
{
    fn new(stream: R) -> Self {
        Self { stream, pending: VecDeque::new() }
    }

    /// Next frame, skipping heart-beats. Dropping the future loses nothing.
    async fn next_frame(&mut self) -> Result<Frame, ConnectionError> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }
            let text = self.stream.next().await.ok_or(ConnectionError::Closed)??;
            self.pending.extend(frames::decode_frames(&text)?);
        }
    }
}

/// Say goodbye and close the socket.
#[cfg(any(test, feature = "csr"))]
async fn shutdown<W>(mut ws_write: W)
where
    W: Sink<Frame, Error = ConnectionError> + Unpin,
{
    let _ = ws_write.send(frames::chat::disconnect_frame()).await;
    let _ = ws_write.close().await;
}
