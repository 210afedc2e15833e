use super::*;

#[test]
fn join_chat_leave_render_in_order() {
    let events = [ChatEvent::join("A"), ChatEvent::chat("A", "hi"), ChatEvent::leave("A")];
    let entries = events.iter().map(entry_for).collect::<Vec<_>>();
    assert_eq!(
        entries,
        vec![
            Entry::Notice("A joined!".to_owned()),
            Entry::Bubble {
                avatar: "A".to_owned(),
                color: color_for("A"),
                sender: "A".to_owned(),
                body: "hi".to_owned(),
            },
            Entry::Notice("A left!".to_owned()),
        ]
    );
}

#[test]
fn bubble_uses_sender_palette_color_and_first_character() {
    let Entry::Bubble { avatar, color, .. } = entry_for(&ChatEvent::chat("Bob", "yo")) else {
        panic!("chat events render as bubbles");
    };
    assert_eq!(avatar, "B");
    assert_eq!(color, "#11c0bb");
}

#[test]
fn notice_ignores_stray_content() {
    let event = ChatEvent { content: Some("ignored".to_owned()), ..ChatEvent::join("Ann") };
    assert_eq!(entry_for(&event), Entry::Notice("Ann joined!".to_owned()));
}

#[test]
fn entry_at_is_stable_as_events_are_appended() {
    let mut events = vec![ChatEvent::join("Ann")];
    let first = entry_at(&events, 0);

    events.push(ChatEvent::chat("Bob", "hi"));
    assert_eq!(entry_at(&events, 0), first);
    assert_eq!(entry_at(&events, 1), Some(entry_for(&ChatEvent::chat("Bob", "hi"))));
}

#[test]
fn entry_at_past_the_end_is_none() {
    assert_eq!(entry_at(&[], 0), None);
    assert_eq!(entry_at(&[ChatEvent::leave("Ann")], 1), None);
}
