//! Wire format for the IPK24-CHAT protocol.
//!
//! Every frame is a single line of ASCII text terminated by CRLF. The first
//! word is a keyword (`AUTH`, `JOIN`, `MSG`, `ERR`, `REPLY`, `BYE`) and the
//! remaining words are positional fields, with free-form content always last.
//!
//! Decoding never fails: a line that does not satisfy the minimum shape of its
//! keyword is classified as [`Message::Unknown`] and it is up to the session
//! layer to decide how to react. Encoding validates every field so that no
//! frame can smuggle an extra line terminator onto the wire.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod errors;
pub mod line;
pub mod message;

pub use codec::{decode, encode};
pub use errors::{ProtocolError, Result};
pub use line::{LineBuffer, MAX_LINE_LENGTH};
pub use message::{Message, MessageKind};

/// Line terminator appended to every outgoing frame.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";
