use std::collections::VecDeque;
use std::time::Duration;

use clap::{Parser, Subcommand};
use frames::chat::{
    ChatEvent, EventKind, chat_frame, connect_frame, decode_event, disconnect_frame, join_frame,
    subscribe_frame,
};
use frames::palette::rgb_for;
use frames::{Frame, decode_frames, encode_frame};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::{Host, Url};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

const DISCONNECT_RECEIPT: &str = "bchat-disconnect";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid websocket URL: {0}")]
    InvalidUrl(String),
    #[error("display name must not be blank")]
    BlankName,
    #[error("message must not be blank")]
    BlankMessage,
    #[error("websocket error: {0}")]
    Ws(Box<tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("frame decode failed: {0}")]
    Decode(#[from] frames::CodecError),
    #[error("timed out waiting for broker handshake")]
    Timeout,
    #[error("broker rejected connection: {0}")]
    Rejected(String),
    #[error("unexpected {0} frame during handshake")]
    Unexpected(frames::Command),
    #[error("broker error: {0}")]
    Broker(String),
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

impl From<tungstenite::Error> for CliError {
    fn from(error: tungstenite::Error) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[derive(Parser, Debug)]
#[command(name = "bchat", about = "Terminal client for the BChat broadcast room")]
struct Cli {
    #[arg(long, env = "BCHAT_URL", default_value = "ws://127.0.0.1:8080/ws/websocket")]
    url: String,

    #[arg(long, env = "BCHAT_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    connect_timeout_secs: u64,

    #[arg(long, default_value_t = false, help = "Print sender names without color")]
    no_color: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    url: String,
    connect_timeout: Duration,
    color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the room; stdin lines are sent as messages.
    Chat {
        #[arg(long)]
        name: String,
    },
    /// Send one message without announcing a join.
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        message: String,
    },
    /// Print room events without joining.
    Listen,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    let ctx = CliContext {
        url: cli.url,
        connect_timeout: Duration::from_secs(cli.connect_timeout_secs),
        color: !cli.no_color,
    };

    match cli.command {
        Command::Chat { name } => run_chat(&ctx, &name).await,
        Command::Send { name, message } => run_send(&ctx, &name, &message).await,
        Command::Listen => run_listen(&ctx).await,
    }
}

async fn run_chat(ctx: &CliContext, name: &str) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::BlankName);
    }

    let (mut write, mut read) = connect(ctx).await?;
    send_stomp(&mut write, &subscribe_frame()).await?;
    send_stomp(&mut write, &join_frame(name)).await?;
    tracing::info!(%name, "joined room; type messages, Ctrl-D to leave");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break Ok(()) };
                let Some(text) = outgoing_text(&line) else { continue };
                // Publishing is fire-and-forget; a dead socket surfaces on the read side.
                if let Err(error) = send_stomp(&mut write, &chat_frame(name, text)).await {
                    tracing::warn!(%error, "publish failed");
                }
            }
            frame = read.next_frame() => {
                match inbound_step(frame, ctx.color) {
                    Ok(Some(line)) => println!("{line}"),
                    Ok(None) => {}
                    Err(error) => break Err(error),
                }
            }
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
    };

    if result.is_ok() {
        disconnect(&mut write, &mut read, ctx.connect_timeout).await;
    }
    result
}

async fn run_send(ctx: &CliContext, name: &str, message: &str) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::BlankName);
    }
    let text = outgoing_text(message).ok_or(CliError::BlankMessage)?;

    let (mut write, mut read) = connect(ctx).await?;
    send_stomp(&mut write, &chat_frame(name, text)).await?;
    disconnect(&mut write, &mut read, ctx.connect_timeout).await;
    eprintln!("sent as {name}");
    Ok(())
}

async fn run_listen(ctx: &CliContext) -> Result<(), CliError> {
    let (mut write, mut read) = connect(ctx).await?;
    send_stomp(&mut write, &subscribe_frame()).await?;
    tracing::info!("listening; Ctrl-C to stop");

    let result = loop {
        tokio::select! {
            frame = read.next_frame() => {
                match inbound_step(frame, ctx.color) {
                    Ok(Some(line)) => println!("{line}"),
                    Ok(None) => {}
                    Err(error) => break Err(error),
                }
            }
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
    };

    if result.is_ok() {
        disconnect(&mut write, &mut read, ctx.connect_timeout).await;
    }
    result
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsWrite = futures_util::stream::SplitSink<WsStream, Message>;
type WsRead = futures_util::stream::SplitStream<WsStream>;

/// Open the socket and complete the STOMP handshake.
async fn connect(ctx: &CliContext) -> Result<(WsWrite, FrameReader<WsRead>), CliError> {
    let host = broker_host(&ctx.url)?;
    let (stream, _) = connect_async(ctx.url.as_str()).await?;
    let (mut write, read) = stream.split();
    let mut read = FrameReader::new(read);

    send_stomp(&mut write, &connect_frame(&host)).await?;
    let reply = tokio::time::timeout(ctx.connect_timeout, read.next_frame())
        .await
        .map_err(|_| CliError::Timeout)??;
    check_handshake(&reply)?;

    tracing::debug!(url = %ctx.url, version = reply.header("version").unwrap_or("1.0"), "connected");
    Ok((write, read))
}

/// Send `DISCONNECT` and wait briefly for its receipt so queued sends land.
async fn disconnect<W, R>(write: &mut W, read: &mut FrameReader<R>, wait: Duration)
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let bye = disconnect_frame().with_header("receipt", DISCONNECT_RECEIPT);
    if let Err(error) = send_stomp(write, &bye).await {
        tracing::debug!(%error, "disconnect send failed");
        return;
    }

    let receipt = async {
        loop {
            match read.next_frame().await {
                Ok(frame) if frame.header("receipt-id") == Some(DISCONNECT_RECEIPT) => return,
                Ok(_) | Err(CliError::Decode(_)) => {}
                Err(_) => return,
            }
        }
    };
    if tokio::time::timeout(wait, receipt).await.is_err() {
        tracing::debug!("no disconnect receipt before timeout");
    }
    let _ = write.close().await;
}

async fn send_stomp<W>(write: &mut W, frame: &Frame) -> Result<(), CliError>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    write.send(Message::text(encode_frame(frame))).await?;
    Ok(())
}

/// Splits socket messages into STOMP frames; one message may pack several.
struct FrameReader<R> {
    stream: R,
    pending: VecDeque<Frame>,
}

impl<R> FrameReader<R>
where
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    fn new(stream: R) -> Self {
        Self { stream, pending: VecDeque::new() }
    }

    /// Next frame, skipping heart-beats. Cancel-safe: decoding never spans an await.
    async fn next_frame(&mut self) -> Result<Frame, CliError> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }
            let Some(message) = self.stream.next().await else {
                return Err(CliError::WsClosed);
            };
            let text = match message? {
                Message::Text(text) => text.as_str().to_owned(),
                Message::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Message::Close(_) => return Err(CliError::WsClosed),
                _ => continue,
            };
            self.pending.extend(decode_frames(&text)?);
        }
    }
}

fn check_handshake(reply: &Frame) -> Result<(), CliError> {
    match reply.command {
        frames::Command::Connected => Ok(()),
        frames::Command::Error => Err(CliError::Rejected(error_message(reply))),
        other => Err(CliError::Unexpected(other)),
    }
}

/// One socket read inside a session: a line to print, nothing, or the end.
///
/// Undecodable frames are logged and skipped; transport errors, closes and
/// broker `ERROR`s end the session.
fn inbound_step(frame: Result<Frame, CliError>, color: bool) -> Result<Option<String>, CliError> {
    match frame {
        Ok(frame) => inbound_line(&frame, color),
        Err(CliError::Decode(error)) => {
            tracing::warn!(%error, "dropping undecodable frame");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Render a post-handshake frame, or fail on a broker `ERROR`.
fn inbound_line(frame: &Frame, color: bool) -> Result<Option<String>, CliError> {
    match frame.command {
        frames::Command::Message => match decode_event(&frame.body) {
            Ok(event) => Ok(Some(format_event(&event, color))),
            Err(error) => {
                tracing::warn!(%error, "dropping chat payload");
                Ok(None)
            }
        },
        frames::Command::Error => Err(CliError::Broker(error_message(frame))),
        _ => Ok(None),
    }
}

fn format_event(event: &ChatEvent, color: bool) -> String {
    let name = if color {
        let (r, g, b) = rgb_for(&event.sender);
        format!("\x1b[1;38;2;{r};{g};{b}m{}\x1b[0m", event.sender)
    } else {
        event.sender.clone()
    };
    match event.kind {
        EventKind::Join => format!("* {name} joined!"),
        EventKind::Leave => format!("* {name} left!"),
        EventKind::Chat => format!("{name}: {}", event.content.as_deref().unwrap_or_default()),
    }
}

fn error_message(frame: &Frame) -> String {
    frame
        .header("message")
        .map(str::to_owned)
        .unwrap_or_else(|| frame.body.trim().to_owned())
}

/// Trimmed line to publish, or `None` for blank input.
fn outgoing_text(line: &str) -> Option<&str> {
    let text = line.trim();
    (!text.is_empty()).then_some(text)
}

/// Hostname of a `ws://`/`wss://` URL, used as the STOMP virtual host.
fn broker_host(raw: &str) -> Result<String, CliError> {
    let invalid = || CliError::InvalidUrl(raw.to_owned());
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(invalid());
    }
    match url.host() {
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        Some(host) => Ok(host.to_string()),
        None => Err(invalid()),
    }
}
