//! Shared STOMP frame model and text codec for the chat WebSocket transport.
//!
//! This crate owns the wire representation used by both `client` and `cli`.
//! Frames travel as STOMP 1.2 text over WebSocket messages; the chat payload
//! carried in `SEND`/`MESSAGE` bodies lives in [`chat`].

pub mod chat;
pub mod palette;

use std::fmt;
use std::str::FromStr;

/// Error returned by [`decode_frame`] and [`decode_frames`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The payload held nothing but end-of-line heart-beats.
    #[error("empty frame")]
    Empty,
    /// The command line names no known STOMP command.
    #[error("unknown frame command: {0}")]
    UnknownCommand(String),
    /// A header line had no `:` separator.
    #[error("malformed header line: {0}")]
    MalformedHeader(String),
    /// A header used an escape sequence STOMP 1.2 does not define.
    #[error("invalid header escape in: {0}")]
    InvalidEscape(String),
    /// The `content-length` header was not a byte count that fits the body.
    #[error("invalid content-length: {0}")]
    InvalidContentLength(String),
    /// The frame ended before the header block or body was complete.
    #[error("truncated frame")]
    Truncated,
    /// The body was not followed by the NUL terminator.
    #[error("frame is missing its NUL terminator")]
    MissingTerminator,
    /// Something other than heart-beat EOLs followed a single frame.
    #[error("unexpected data after frame terminator")]
    TrailingData,
}

/// STOMP 1.2 frame command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    // Client frames.
    Connect,
    Stomp,
    Send,
    Subscribe,
    Unsubscribe,
    Ack,
    Nack,
    Begin,
    Commit,
    Abort,
    Disconnect,
    // Server frames.
    Connected,
    Message,
    Receipt,
    Error,
}

impl Command {
    /// Wire spelling of the command.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Stomp => "STOMP",
            Self::Send => "SEND",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Ack => "ACK",
            Self::Nack => "NACK",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Abort => "ABORT",
            Self::Disconnect => "DISCONNECT",
            Self::Connected => "CONNECTED",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
        }
    }

    /// `CONNECT` and `CONNECTED` headers are never escaped (STOMP 1.2).
    fn escapes_headers(self) -> bool {
        !matches!(self, Self::Connect | Self::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s {
            "CONNECT" => Self::Connect,
            "STOMP" => Self::Stomp,
            "SEND" => Self::Send,
            "SUBSCRIBE" => Self::Subscribe,
            "UNSUBSCRIBE" => Self::Unsubscribe,
            "ACK" => Self::Ack,
            "NACK" => Self::Nack,
            "BEGIN" => Self::Begin,
            "COMMIT" => Self::Commit,
            "ABORT" => Self::Abort,
            "DISCONNECT" => Self::Disconnect,
            "CONNECTED" => Self::Connected,
            "MESSAGE" => Self::Message,
            "RECEIPT" => Self::Receipt,
            "ERROR" => Self::Error,
            other => return Err(CodecError::UnknownCommand(other.to_owned())),
        };
        Ok(command)
    }
}

/// A single STOMP frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame command.
    pub command: Command,
    /// Headers in wire order. Repeated names are kept; the first one wins.
    pub headers: Vec<(String, String)>,
    /// Frame body, usually JSON for `SEND` and `MESSAGE`.
    pub body: String,
}

impl Frame {
    /// Create a frame with no headers and an empty body.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self { command, headers: Vec::new(), body: String::new() }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the first header named `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Encode a frame as STOMP text, NUL terminator included.
///
/// A `content-length` header is added for non-empty bodies unless the frame
/// already carries one.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let escape = frame.command.escapes_headers();
    let mut out = String::with_capacity(frame.body.len() + 64);

    out.push_str(frame.command.as_str());
    out.push('\n');
    for (name, value) in &frame.headers {
        push_header(&mut out, name, value, escape);
    }
    if !frame.body.is_empty() && frame.header("content-length").is_none() {
        push_header(&mut out, "content-length", &frame.body.len().to_string(), false);
    }
    out.push('\n');
    out.push_str(&frame.body);
    out.push('\0');
    out
}

/// Decode exactly one STOMP frame from a text payload.
///
/// Leading end-of-line heart-beats and trailing EOLs after the terminator
/// are tolerated; both `\n` and `\r\n` line endings are accepted.
///
/// # Errors
///
/// Returns a [`CodecError`] describing the first structural problem found,
/// including [`CodecError::TrailingData`] when a second frame follows.
pub fn decode_frame(raw: &str) -> Result<Frame, CodecError> {
    let (frame, rest) = decode_next(raw)?;
    if !is_heartbeat(rest) {
        return Err(CodecError::TrailingData);
    }
    Ok(frame)
}

/// Decode every frame in a payload that may pack several back to back.
///
/// Heart-beat EOLs between frames are skipped. A payload of only
/// heart-beats yields no frames.
///
/// # Errors
///
/// Returns the first [`CodecError`] hit; frames before it are discarded.
pub fn decode_frames(raw: &str) -> Result<Vec<Frame>, CodecError> {
    let mut frames = Vec::new();
    let mut rest = raw;
    while !is_heartbeat(rest) {
        let (frame, next) = decode_next(rest)?;
        frames.push(frame);
        rest = next;
    }
    Ok(frames)
}

/// Decode the first frame and return it with whatever follows its `\0`.
fn decode_next(raw: &str) -> Result<(Frame, &str), CodecError> {
    let mut cursor = raw.trim_start_matches(['\r', '\n']);
    if cursor.is_empty() {
        return Err(CodecError::Empty);
    }

    let command: Command = next_line(&mut cursor).ok_or(CodecError::Truncated)?.parse()?;
    let escape = command.escapes_headers();

    let mut headers = Vec::new();
    loop {
        let line = next_line(&mut cursor).ok_or(CodecError::Truncated)?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| CodecError::MalformedHeader(line.to_owned()))?;
        if escape {
            headers.push((unescape(name)?, unescape(value)?));
        } else {
            headers.push((name.to_owned(), value.to_owned()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .map(|(_, value)| value.as_str());

    let end = match content_length {
        Some(raw_len) => {
            let len = raw_len
                .trim()
                .parse::<usize>()
                .map_err(|_| CodecError::InvalidContentLength(raw_len.to_owned()))?;
            if cursor.get(..len).is_none() {
                return Err(CodecError::InvalidContentLength(raw_len.to_owned()));
            }
            if !cursor[len..].starts_with('\0') {
                return Err(CodecError::MissingTerminator);
            }
            len
        }
        None => cursor.find('\0').ok_or(CodecError::MissingTerminator)?,
    };

    let frame = Frame { command, headers, body: cursor[..end].to_owned() };
    Ok((frame, &cursor[end + 1..]))
}

/// True when the payload carries only heart-beat EOLs.
#[must_use]
pub fn is_heartbeat(raw: &str) -> bool {
    raw.chars().all(|c| c == '\n' || c == '\r')
}

fn next_line<'a>(cursor: &mut &'a str) -> Option<&'a str> {
    let end = cursor.find('\n')?;
    let line = &cursor[..end];
    *cursor = &cursor[end + 1..];
    Some(line.strip_suffix('\r').unwrap_or(line))
}

fn push_header(out: &mut String, name: &str, value: &str, escape: bool) {
    if escape {
        push_escaped(out, name);
        out.push(':');
        push_escaped(out, value);
    } else {
        out.push_str(name);
        out.push(':');
        out.push_str(value);
    }
    out.push('\n');
}

fn push_escaped(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
}

fn unescape(raw: &str) -> Result<String, CodecError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(CodecError::InvalidEscape(raw.to_owned())),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
