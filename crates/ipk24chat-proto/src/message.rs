//! Typed protocol messages.
//!
//! [`Message`] is a closed set: one variant per wire keyword plus
//! [`Message::Unknown`] for anything that fails classification. Consumers match
//! on it exhaustively, so adding a keyword is a compile error everywhere it is
//! not yet handled.

use std::fmt;

/// Wire keyword of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `AUTH`
    Auth,
    /// `JOIN`
    Join,
    /// `MSG`
    Chat,
    /// `ERR`
    Error,
    /// `REPLY`
    Reply,
    /// `BYE`
    Bye,
    /// Anything else.
    Unknown,
}

impl MessageKind {
    /// Keyword as it appears on the wire. `None` for [`MessageKind::Unknown`].
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Auth => Some("AUTH"),
            Self::Join => Some("JOIN"),
            Self::Chat => Some("MSG"),
            Self::Error => Some("ERR"),
            Self::Reply => Some("REPLY"),
            Self::Bye => Some("BYE"),
            Self::Unknown => None,
        }
    }

    /// Look up a keyword. Matching is exact (keywords are upper case).
    pub fn from_keyword(word: &str) -> Self {
        match word {
            "AUTH" => Self::Auth,
            "JOIN" => Self::Join,
            "MSG" => Self::Chat,
            "ERR" => Self::Error,
            "REPLY" => Self::Reply,
            "BYE" => Self::Bye,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("UNKNOWN"))
    }
}

/// One protocol frame.
///
/// Constructed fresh for every send or receive and never mutated afterwards.
/// Content fields hold the content words joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `AUTH {username} AS {display_name} USING {secret}`
    Auth {
        /// Account name
        username: String,
        /// Name shown to other users
        display_name: String,
        /// Shared secret
        secret: String,
    },

    /// `JOIN {channel} AS {display_name}`
    Join {
        /// Channel to switch to
        channel: String,
        /// Name shown to other users
        display_name: String,
    },

    /// `MSG FROM {display_name} IS {content}`
    Chat {
        /// Sender's display name
        display_name: String,
        /// Message text
        content: String,
    },

    /// `ERR FROM {display_name} IS {content}`
    Error {
        /// Sender's display name
        display_name: String,
        /// Error description
        content: String,
    },

    /// `REPLY {OK|NOK} IS {content}`
    Reply {
        /// `true` if the status token was `OK`
        ok: bool,
        /// Reply text
        content: String,
    },

    /// `BYE`
    Bye,

    /// A line that failed classification.
    Unknown {
        /// The words of the offending line, in order.
        words: Vec<String>,
    },
}

impl Message {
    /// Keyword of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Auth { .. } => MessageKind::Auth,
            Self::Join { .. } => MessageKind::Join,
            Self::Chat { .. } => MessageKind::Chat,
            Self::Error { .. } => MessageKind::Error,
            Self::Reply { .. } => MessageKind::Reply,
            Self::Bye => MessageKind::Bye,
            Self::Unknown { .. } => MessageKind::Unknown,
        }
    }

    /// Classify a tokenized line.
    ///
    /// Minimum shapes (word offsets are zero-based):
    ///
    /// - `REPLY`: status at 1, content from 3, so more than 2 words
    /// - `MSG`/`ERR`: sender at 2, content from 4, so more than 3 words
    /// - `AUTH`: username at 1, display name at 3, secret at 5
    /// - `JOIN`: channel at 1, display name at 3
    /// - `BYE`: exactly one word
    ///
    /// The connective words (`FROM`, `IS`, `AS`, `USING`) are positional and
    /// not checked. Anything short of its minimum becomes
    /// [`Message::Unknown`].
    pub fn from_words(words: Vec<String>) -> Self {
        let kind = words.first().map_or(MessageKind::Unknown, |w| MessageKind::from_keyword(w));

        let classified = match kind {
            MessageKind::Reply if words.len() > 2 => {
                Some(Self::Reply { ok: words[1] == "OK", content: join_from(&words, 3) })
            },
            MessageKind::Chat if words.len() > 3 => Some(Self::Chat {
                display_name: words[2].clone(),
                content: join_from(&words, 4),
            }),
            MessageKind::Error if words.len() > 3 => Some(Self::Error {
                display_name: words[2].clone(),
                content: join_from(&words, 4),
            }),
            MessageKind::Auth if words.len() == 6 => Some(Self::Auth {
                username: words[1].clone(),
                display_name: words[3].clone(),
                secret: words[5].clone(),
            }),
            MessageKind::Join if words.len() == 4 => {
                Some(Self::Join { channel: words[1].clone(), display_name: words[3].clone() })
            },
            MessageKind::Bye if words.len() == 1 => Some(Self::Bye),
            _ => None,
        };

        classified.unwrap_or(Self::Unknown { words })
    }

    /// Decode and classify one line of wire text.
    pub fn parse(line: &[u8]) -> Self {
        Self::from_words(crate::decode(line))
    }
}

/// Join `words[start..]` with single spaces. Empty if `start` is past the end.
fn join_from(words: &[String], start: usize) -> String {
    words.get(start..).map(|rest| rest.join(" ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn classify_reply() {
        assert_eq!(Message::from_words(words("REPLY OK IS Welcome")), Message::Reply {
            ok: true,
            content: "Welcome".into()
        });
        assert_eq!(Message::from_words(words("REPLY NOK IS Bad secret")), Message::Reply {
            ok: false,
            content: "Bad secret".into()
        });
    }

    #[test]
    fn reply_with_three_words_has_empty_content() {
        // Offset 3 is past the end, which still satisfies the > 2 minimum.
        assert_eq!(Message::from_words(words("REPLY OK IS")), Message::Reply {
            ok: true,
            content: String::new()
        });
    }

    #[test]
    fn classify_chat() {
        assert_eq!(Message::from_words(words("MSG FROM Bob IS hi there")), Message::Chat {
            display_name: "Bob".into(),
            content: "hi there".into()
        });
    }

    #[test]
    fn short_chat_is_unknown() {
        let message = Message::from_words(words("MSG FROM"));
        assert_eq!(message, Message::Unknown { words: words("MSG FROM") });
    }

    #[test]
    fn short_error_is_unknown() {
        assert_eq!(Message::from_words(words("ERR FROM Server")).kind(), MessageKind::Unknown);
    }

    #[test]
    fn bye_with_trailing_words_is_unknown() {
        assert_eq!(Message::from_words(words("BYE")), Message::Bye);
        assert_eq!(Message::from_words(words("BYE now")).kind(), MessageKind::Unknown);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(Message::from_words(words("reply OK IS x")).kind(), MessageKind::Unknown);
    }

    #[test]
    fn empty_line_is_unknown() {
        assert_eq!(Message::parse(b"\r\n"), Message::Unknown { words: vec![] });
    }

    #[test]
    fn classify_auth_and_join() {
        assert_eq!(Message::parse(b"AUTH alice AS Alice USING s3cret\r\n"), Message::Auth {
            username: "alice".into(),
            display_name: "Alice".into(),
            secret: "s3cret".into(),
        });
        assert_eq!(Message::parse(b"JOIN general AS Alice\r\n"), Message::Join {
            channel: "general".into(),
            display_name: "Alice".into(),
        });
    }
}
