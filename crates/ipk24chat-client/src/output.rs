//! User-visible output lines.

use std::fmt;

/// Static usage text printed by `/help`.
pub const HELP_TEXT: &str = "/auth\t{Username} {Secret} {DisplayName}\n/join\t{ChannelID}\n/rename\t{DisplayName}\n/help";

/// Stream a line of output belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Conversation content.
    Stdout,
    /// Replies, errors and diagnostics.
    Stderr,
}

/// One line (or block, for help) the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Server reply to a request.
    Reply {
        /// `true` for `OK`.
        ok: bool,
        /// Reply text.
        content: String,
    },

    /// Chat message from another user.
    Chat {
        /// Sender's display name.
        sender: String,
        /// Message text.
        content: String,
    },

    /// Error reported by the server.
    PeerError {
        /// Sender's display name.
        sender: String,
        /// Error text.
        content: String,
    },

    /// Local validation or I/O error.
    LocalError(String),

    /// Usage text.
    Help,
}

impl Output {
    /// Stream this output is written to.
    pub fn stream(&self) -> OutputStream {
        match self {
            Self::Chat { .. } | Self::Help => OutputStream::Stdout,
            Self::Reply { .. } | Self::PeerError { .. } | Self::LocalError(_) => {
                OutputStream::Stderr
            },
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply { ok: true, content } => write!(f, "Success: {content}"),
            Self::Reply { ok: false, content } => write!(f, "Failure: {content}"),
            Self::Chat { sender, content } => write!(f, "{sender}: {content}"),
            Self::PeerError { sender, content } => write!(f, "ERR FROM {sender}: {content}"),
            Self::LocalError(message) => write!(f, "ERR: {message}"),
            Self::Help => f.write_str(HELP_TEXT),
        }
    }
}
