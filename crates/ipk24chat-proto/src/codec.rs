//! Frame encoding and tokenizing.
//!
//! Stateless. [`encode`] writes the exact wire text for a [`Message`];
//! [`decode`] strips the line terminator and splits on whitespace.

use bytes::BufMut;

use crate::{LINE_TERMINATOR, Message, MessageKind, ProtocolError, Result};

/// Split one line of wire text into words.
///
/// Strips a trailing `\r\n` (or lone `\n`) and splits on ASCII/Unicode
/// whitespace. Invalid UTF-8 is replaced rather than rejected, so this never
/// fails; garbage simply produces words that classify as
/// [`Message::Unknown`]. Blank input yields an empty vector.
pub fn decode(line: &[u8]) -> Vec<String> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    String::from_utf8_lossy(line).split_whitespace().map(str::to_string).collect()
}

/// Encode `message` as wire text, terminator included.
///
/// # Errors
///
/// - `ProtocolError::EmptyField` if a positional field or content is empty
/// - `ProtocolError::NotAToken` if a positional field contains whitespace
/// - `ProtocolError::EmbeddedTerminator` if content contains CR or LF
/// - `ProtocolError::Unencodable` for [`Message::Unknown`]
pub fn encode(message: &Message, dst: &mut impl BufMut) -> Result<()> {
    let kind = message.kind();

    match message {
        Message::Auth { username, display_name, secret } => {
            token(kind, "username", username)?;
            token(kind, "display_name", display_name)?;
            token(kind, "secret", secret)?;
            put_words(dst, &[
                "AUTH",
                username.as_str(),
                "AS",
                display_name.as_str(),
                "USING",
                secret.as_str(),
            ]);
        },
        Message::Join { channel, display_name } => {
            token(kind, "channel", channel)?;
            token(kind, "display_name", display_name)?;
            put_words(dst, &["JOIN", channel.as_str(), "AS", display_name.as_str()]);
        },
        Message::Chat { display_name, content } | Message::Error { display_name, content } => {
            token(kind, "display_name", display_name)?;
            text(kind, content)?;
            let keyword = if kind == MessageKind::Chat { "MSG" } else { "ERR" };
            put_words(dst, &[keyword, "FROM", display_name.as_str(), "IS", content.as_str()]);
        },
        Message::Reply { ok, content } => {
            text(kind, content)?;
            let status = if *ok { "OK" } else { "NOK" };
            put_words(dst, &["REPLY", status, "IS", content.as_str()]);
        },
        Message::Bye => put_words(dst, &["BYE"]),
        Message::Unknown { .. } => return Err(ProtocolError::Unencodable),
    }

    dst.put_slice(LINE_TERMINATOR);
    Ok(())
}

impl Message {
    /// Encode into a fresh buffer. See [`encode`].
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode(self, &mut buf)?;
        Ok(buf)
    }
}

fn put_words(dst: &mut impl BufMut, words: &[&str]) {
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            dst.put_u8(b' ');
        }
        dst.put_slice(word.as_bytes());
    }
}

fn token(kind: MessageKind, field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProtocolError::EmptyField { kind, field });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ProtocolError::NotAToken { kind, field, value: value.to_string() });
    }
    Ok(())
}

fn text(kind: MessageKind, content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(ProtocolError::EmptyField { kind, field: "content" });
    }
    if content.contains(['\r', '\n']) {
        return Err(ProtocolError::EmbeddedTerminator { kind });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(message: &Message) -> String {
        String::from_utf8(message.to_wire().unwrap()).unwrap()
    }

    #[test]
    fn encode_literal_forms() {
        let auth = Message::Auth {
            username: "alice".into(),
            display_name: "Alice".into(),
            secret: "s3cret".into(),
        };
        assert_eq!(wire(&auth), "AUTH alice AS Alice USING s3cret\r\n");

        let join = Message::Join { channel: "general".into(), display_name: "Alice".into() };
        assert_eq!(wire(&join), "JOIN general AS Alice\r\n");

        let chat = Message::Chat { display_name: "Alice".into(), content: "hi there".into() };
        assert_eq!(wire(&chat), "MSG FROM Alice IS hi there\r\n");

        let err = Message::Error { display_name: "Alice".into(), content: "oops".into() };
        assert_eq!(wire(&err), "ERR FROM Alice IS oops\r\n");

        assert_eq!(wire(&Message::Bye), "BYE\r\n");
    }

    #[test]
    fn decode_strips_terminator() {
        assert_eq!(decode(b"REPLY OK IS Welcome\r\n"), vec!["REPLY", "OK", "IS", "Welcome"]);
        assert_eq!(decode(b"BYE\n"), vec!["BYE"]);
        assert_eq!(decode(b"  MSG   FROM  x IS y "), vec!["MSG", "FROM", "x", "IS", "y"]);
    }

    #[test]
    fn decode_blank_is_empty() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"\r\n").is_empty());
        assert!(decode(b" \t \r\n").is_empty());
    }

    #[test]
    fn decode_invalid_utf8_does_not_fail() {
        let words = decode(b"\xff\xfe MSG\r\n");
        assert_eq!(words.len(), 2);
        assert_eq!(Message::from_words(words).kind(), MessageKind::Unknown);
    }

    #[test]
    fn reject_empty_display_name() {
        let chat = Message::Chat { display_name: String::new(), content: "hi".into() };
        assert!(matches!(chat.to_wire(), Err(ProtocolError::EmptyField {
            field: "display_name",
            ..
        })));
    }

    #[test]
    fn reject_whitespace_in_token() {
        let join = Message::Join { channel: "two words".into(), display_name: "Alice".into() };
        assert!(matches!(join.to_wire(), Err(ProtocolError::NotAToken { field: "channel", .. })));
    }

    #[test]
    fn reject_embedded_terminator() {
        let chat = Message::Chat { display_name: "Alice".into(), content: "a\r\nBYE".into() };
        assert!(matches!(chat.to_wire(), Err(ProtocolError::EmbeddedTerminator { .. })));
    }

    #[test]
    fn unknown_is_unencodable() {
        let unknown = Message::Unknown { words: vec!["HELLO".into()] };
        assert_eq!(unknown.to_wire(), Err(ProtocolError::Unencodable));
    }
}
