//! Command parsing for local input.
//!
//! This module parses one line of local input into a [`Command`]. Validation
//! of argument counts happens here; whether the command is legal in the
//! current session state is decided by the [`crate::Session`].

use crate::CommandError;

/// Line that requests termination of the session.
pub const BYE_COMMAND: &str = "BYE";

/// Parsed line of local input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Authenticate with the server.
    Auth {
        /// Account name.
        username: String,
        /// Shared secret.
        secret: String,
        /// Name shown to other users.
        display_name: String,
    },

    /// Switch to a channel.
    Join {
        /// Channel identifier.
        channel: String,
    },

    /// Change the local display name.
    Rename {
        /// New display name.
        display_name: String,
    },

    /// Print usage text.
    Help,

    /// End the session.
    Bye,

    /// Send a chat message.
    Message {
        /// Content words joined by single spaces.
        content: String,
    },

    /// Blank line.
    Empty,

    /// Known command with the wrong number of arguments.
    InvalidArgs(CommandError),
}

/// Parse one line of local input.
///
/// Commands start with `/`. `BYE` on its own ends the session. Any other
/// non-blank line is chat content.
pub fn parse(input: &str) -> Command {
    let words: Vec<&str> = input.split_whitespace().collect();

    let Some(&first) = words.first() else {
        return Command::Empty;
    };

    match (first, &words[1..]) {
        ("/auth", [username, secret, display_name]) => Command::Auth {
            username: (*username).to_string(),
            secret: (*secret).to_string(),
            display_name: (*display_name).to_string(),
        },
        ("/auth", _) => Command::InvalidArgs(CommandError::InvalidAuth),

        ("/join", [channel]) => Command::Join { channel: (*channel).to_string() },
        ("/join", _) => Command::InvalidArgs(CommandError::InvalidJoin),

        ("/rename", [display_name]) => Command::Rename { display_name: (*display_name).to_string() },
        ("/rename", _) => Command::InvalidArgs(CommandError::InvalidRename),

        ("/help", _) => Command::Help,

        (BYE_COMMAND, []) => Command::Bye,

        _ => Command::Message { content: words.join(" ") },
    }
}
