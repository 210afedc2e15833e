use super::*;
use frames::Frame;
use frames::chat::{ChatEvent, decode_event};
use futures::channel::mpsc::{self, UnboundedReceiver};

fn session() -> (ChatSession, UnboundedReceiver<Frame>) {
    let (tx, rx) = mpsc::unbounded();
    (ChatSession::new("Ann".to_owned(), tx), rx)
}

fn connected() -> ChatState {
    let mut chat = ChatState::default();
    chat.mark_connected();
    chat
}

#[test]
fn submit_message_publishes_and_clears_input() {
    let (session, mut rx) = session();
    let mut input = "hello".to_owned();

    let outcome = submit_message(&session, &connected(), &mut input);

    assert_eq!(outcome, SendOutcome::Sent);
    assert!(input.is_empty());
    let frame = rx.try_next().expect("queued").expect("open");
    assert_eq!(decode_event(&frame.body).expect("event"), ChatEvent::chat("Ann", "hello"));
    assert!(rx.try_next().is_err(), "exactly one frame queued");
}

#[test]
fn submit_message_blank_input_publishes_nothing_and_keeps_field() {
    let (session, mut rx) = session();
    let mut input = "   ".to_owned();

    let outcome = submit_message(&session, &connected(), &mut input);

    assert_eq!(outcome, SendOutcome::Empty);
    assert_eq!(input, "   ");
    assert!(rx.try_next().is_err());
}

#[test]
fn submit_message_before_handshake_keeps_text() {
    let (session, mut rx) = session();
    let mut input = "early".to_owned();

    let outcome = submit_message(&session, &ChatState::default(), &mut input);

    assert_eq!(outcome, SendOutcome::NotConnected);
    assert_eq!(input, "early");
    assert!(rx.try_next().is_err());
}

#[test]
fn submit_message_after_failure_keeps_text() {
    let (session, _rx) = session();
    let mut chat = connected();
    chat.mark_failed();
    let mut input = "late".to_owned();

    assert_eq!(submit_message(&session, &chat, &mut input), SendOutcome::NotConnected);
    assert_eq!(input, "late");
}
