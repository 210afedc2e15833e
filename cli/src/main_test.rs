use super::*;

use clap::Parser;

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn chat_subcommand_parses_name_and_defaults() {
    let cli = Cli::try_parse_from(["bchat", "chat", "--name", "Ann"]).expect("parse");
    assert_eq!(cli.connect_timeout_secs, 5);
    assert!(!cli.no_color);
    assert!(matches!(cli.command, Command::Chat { ref name } if name == "Ann"));
}

#[test]
fn send_subcommand_requires_message() {
    assert!(Cli::try_parse_from(["bchat", "send", "--name", "Ann"]).is_err());
    let cli = Cli::try_parse_from([
        "bchat",
        "--url",
        "wss://chat.example.com/ws/websocket",
        "send",
        "--name",
        "Ann",
        "--message",
        "hello",
    ])
    .expect("parse");
    assert_eq!(cli.url, "wss://chat.example.com/ws/websocket");
    assert!(matches!(cli.command, Command::Send { ref message, .. } if message == "hello"));
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn broker_host_strips_scheme_port_and_path() {
    assert_eq!(broker_host("ws://127.0.0.1:8080/ws/websocket").expect("host"), "127.0.0.1");
    assert_eq!(broker_host("wss://chat.example.com/ws").expect("host"), "chat.example.com");
    assert_eq!(broker_host("ws://user@host:1/x?y=1").expect("host"), "host");
    assert_eq!(broker_host("ws://[::1]:8080/ws").expect("host"), "::1");
}

#[test]
fn broker_host_accepts_uppercase_scheme_and_lowercases_host() {
    assert_eq!(broker_host("WS://Chat.Example.com:8080/ws").expect("host"), "chat.example.com");
}

#[test]
fn broker_host_rejects_non_websocket_urls() {
    assert!(matches!(broker_host("http://host/ws"), Err(CliError::InvalidUrl(_))));
    assert!(matches!(broker_host("ws://"), Err(CliError::InvalidUrl(_))));
    assert!(matches!(broker_host("not a url"), Err(CliError::InvalidUrl(_))));
}

#[test]
fn outgoing_text_trims_and_skips_blank_lines() {
    assert_eq!(outgoing_text("  hi there \n"), Some("hi there"));
    assert_eq!(outgoing_text("   "), None);
    assert_eq!(outgoing_text(""), None);
}

#[test]
fn check_handshake_maps_error_and_unexpected_frames() {
    assert!(check_handshake(&Frame::new(frames::Command::Connected)).is_ok());

    let error = Frame::new(frames::Command::Error).with_header("message", "no host");
    assert!(matches!(check_handshake(&error), Err(CliError::Rejected(ref m)) if m == "no host"));

    let receipt = Frame::new(frames::Command::Receipt);
    assert!(matches!(
        check_handshake(&receipt),
        Err(CliError::Unexpected(frames::Command::Receipt))
    ));
}

#[test]
fn format_event_renders_each_kind_without_color() {
    assert_eq!(format_event(&ChatEvent::join("Ann"), false), "* Ann joined!");
    assert_eq!(format_event(&ChatEvent::leave("Ann"), false), "* Ann left!");
    assert_eq!(format_event(&ChatEvent::chat("Ann", "hi"), false), "Ann: hi");
}

#[test]
fn format_event_colors_sender_with_palette_rgb() {
    let line = format_event(&ChatEvent::chat("Ann", "hi"), true);
    assert!(line.starts_with("\x1b[1;38;2;11;175;0mAnn\x1b[0m"));
    assert!(line.ends_with(": hi"));
}

#[test]
fn inbound_line_skips_bad_payloads_and_fails_on_broker_error() {
    let good = Frame::new(frames::Command::Message).with_body(r#"{"sender":"Bob","type":"JOIN"}"#);
    assert_eq!(inbound_line(&good, false).expect("ok"), Some("* Bob joined!".to_owned()));

    let bad = Frame::new(frames::Command::Message).with_body("{nope");
    assert_eq!(inbound_line(&bad, false).expect("ok"), None);

    let receipt = Frame::new(frames::Command::Receipt);
    assert_eq!(inbound_line(&receipt, false).expect("ok"), None);

    let error = Frame::new(frames::Command::Error).with_body("gone");
    assert!(matches!(inbound_line(&error, false), Err(CliError::Broker(ref m)) if m == "gone"));
}

#[test]
fn inbound_step_skips_undecodable_frames() {
    let decode_error = Err(CliError::Decode(frames::CodecError::UnknownCommand("BOGUS".to_owned())));
    assert!(matches!(inbound_step(decode_error, false), Ok(None)));
}

#[test]
fn inbound_step_ends_session_on_close_and_broker_error() {
    assert!(matches!(inbound_step(Err(CliError::WsClosed), false), Err(CliError::WsClosed)));

    let error = Frame::new(frames::Command::Error).with_header("message", "bye");
    assert!(matches!(inbound_step(Ok(error), false), Err(CliError::Broker(_))));

    let join = Frame::new(frames::Command::Message).with_body(r#"{"sender":"Bob","type":"JOIN"}"#);
    assert_eq!(inbound_step(Ok(join), false).expect("ok"), Some("* Bob joined!".to_owned()));
}

// =============================================================
// Frame reader
// =============================================================

fn reader(messages: Vec<Message>) -> FrameReader<impl Stream<Item = Result<Message, tungstenite::Error>> + Unpin> {
    FrameReader::new(futures_util::stream::iter(messages.into_iter().map(Ok)))
}

#[tokio::test]
async fn frame_reader_yields_every_packed_frame() {
    let packed = "MESSAGE\n\n{\"sender\":\"A\",\"type\":\"JOIN\"}\0\nMESSAGE\n\n{\"sender\":\"B\",\"type\":\"JOIN\"}\0";
    let mut read = reader(vec![Message::text(packed)]);

    let first = read.next_frame().await.expect("first");
    let second = read.next_frame().await.expect("second");
    assert_eq!(decode_event(&first.body).expect("event"), ChatEvent::join("A"));
    assert_eq!(decode_event(&second.body).expect("event"), ChatEvent::join("B"));
    assert!(matches!(read.next_frame().await, Err(CliError::WsClosed)));
}

#[tokio::test]
async fn frame_reader_skips_heartbeats_and_reports_bad_frames() {
    let mut read = reader(vec![
        Message::text("\n"),
        Message::text("BOGUS\n\n\0"),
        Message::text("RECEIPT\nreceipt-id:1\n\n\0"),
    ]);

    assert!(matches!(read.next_frame().await, Err(CliError::Decode(_))));
    let receipt = read.next_frame().await.expect("receipt");
    assert_eq!(receipt.header("receipt-id"), Some("1"));
}
