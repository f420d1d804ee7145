//! Session events and actions.

use ipk24chat_proto::Message;

use crate::{Command, Output};

/// Events the caller feeds into the session.
///
/// The caller is responsible for:
/// - Reading and parsing local input
/// - Receiving and classifying frames from the network
/// - Reporting transport outcomes (closed stream, failed send)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One line of local input.
    Command(Command),

    /// One classified frame from the server.
    FrameReceived(Message),

    /// The user pressed the interrupt key.
    Interrupt,

    /// Local input reached end-of-stream.
    InputClosed,

    /// The server closed the connection.
    PeerClosed,

    /// Reading from the transport failed.
    ReceiveFailed {
        /// Error description.
        reason: String,
    },

    /// Executing a [`SessionAction::Send`] failed.
    SendFailed {
        /// Error description.
        reason: String,
    },
}

/// Actions the session produces for the caller to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Encode and write this frame to the transport.
    Send(Message),

    /// Show this line to the user.
    Print(Output),
}
