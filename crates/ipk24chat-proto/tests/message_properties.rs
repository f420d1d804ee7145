//! Property-based tests for message encoding and classification.
//!
//! Verify that every well-formed frame survives decode + encode byte-for-byte
//! and that anything below a keyword's minimum shape classifies as Unknown.

use ipk24chat_proto::{LineBuffer, Message, MessageKind};
use proptest::prelude::*;

/// Strategy for single-token fields (usernames, channels, display names).
fn arbitrary_token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,20}"
}

/// Strategy for content: one or more tokens joined by single spaces.
fn arbitrary_content() -> impl Strategy<Value = String> {
    prop::collection::vec("[!-~]{1,12}", 1..8).prop_map(|words| words.join(" "))
}

/// Strategy for every encodable message.
fn arbitrary_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        (arbitrary_token(), arbitrary_token(), arbitrary_token()).prop_map(
            |(username, display_name, secret)| Message::Auth { username, display_name, secret }
        ),
        (arbitrary_token(), arbitrary_token())
            .prop_map(|(channel, display_name)| Message::Join { channel, display_name }),
        (arbitrary_token(), arbitrary_content())
            .prop_map(|(display_name, content)| Message::Chat { display_name, content }),
        (arbitrary_token(), arbitrary_content())
            .prop_map(|(display_name, content)| Message::Error { display_name, content }),
        (any::<bool>(), arbitrary_content()).prop_map(|(ok, content)| Message::Reply { ok, content }),
        Just(Message::Bye),
    ]
}

proptest! {
    #[test]
    fn prop_decode_then_encode_is_identity(message in arbitrary_message()) {
        let wire = message.to_wire().expect("well-formed message should encode");
        let parsed = Message::parse(&wire);

        prop_assert_eq!(&parsed, &message);

        // PROPERTY: re-encoding the decoded frame reproduces the exact bytes
        let rewire = parsed.to_wire().expect("decoded message should encode");
        prop_assert_eq!(rewire, wire);
    }

    #[test]
    fn prop_wire_text_is_one_crlf_line(message in arbitrary_message()) {
        let wire = message.to_wire().expect("well-formed message should encode");

        prop_assert!(wire.ends_with(b"\r\n"));
        prop_assert_eq!(wire.iter().filter(|&&b| b == b'\n').count(), 1);
        prop_assert_eq!(wire.iter().filter(|&&b| b == b'\r').count(), 1);
    }

    #[test]
    fn prop_short_chat_and_error_are_unknown(
        keyword in prop_oneof![Just("MSG"), Just("ERR")],
        rest in prop::collection::vec(arbitrary_token(), 0..3),
    ) {
        let mut words = vec![keyword.to_string()];
        words.extend(rest);

        // PROPERTY: sender at offset 2 and content at 4 require more than 3 words
        prop_assert_eq!(Message::from_words(words).kind(), MessageKind::Unknown);
    }

    #[test]
    fn prop_short_reply_is_unknown(rest in prop::collection::vec(arbitrary_token(), 0..2)) {
        let mut words = vec!["REPLY".to_string()];
        words.extend(rest);

        prop_assert_eq!(Message::from_words(words).kind(), MessageKind::Unknown);
    }

    #[test]
    fn prop_line_buffer_reassembles_any_split(
        messages in prop::collection::vec(arbitrary_message(), 1..6),
        split in any::<prop::sample::Index>(),
    ) {
        let mut stream = Vec::new();
        for message in &messages {
            stream.extend(message.to_wire().expect("well-formed message should encode"));
        }

        let cut = split.index(stream.len());
        let mut lines = LineBuffer::new();
        let mut parsed = Vec::new();

        lines.extend(&stream[..cut]);
        while let Some(line) = lines.next_line() {
            parsed.push(Message::parse(&line.expect("frames are below the length limit")));
        }
        lines.extend(&stream[cut..]);
        while let Some(line) = lines.next_line() {
            parsed.push(Message::parse(&line.expect("frames are below the length limit")));
        }

        prop_assert_eq!(parsed, messages);
        prop_assert_eq!(lines.pending(), 0);
    }
}
