//! Protocol error types.

use thiserror::Error;

use crate::MessageKind;

/// Convenience alias for codec results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding an outgoing frame or framing inbound bytes.
///
/// Classification has no error type: malformed input is represented as
/// [`crate::Message::Unknown`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A positional field was empty.
    #[error("{kind} frame has an empty {field} field")]
    EmptyField {
        /// Frame being encoded
        kind: MessageKind,
        /// Name of the offending field
        field: &'static str,
    },

    /// A single-token field contained whitespace.
    #[error("{kind} frame {field} field must be a single token, got {value:?}")]
    NotAToken {
        /// Frame being encoded
        kind: MessageKind,
        /// Name of the offending field
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// Content contained a line terminator.
    #[error("{kind} frame content contains a line terminator")]
    EmbeddedTerminator {
        /// Frame being encoded
        kind: MessageKind,
    },

    /// An inbound line exceeded the length limit.
    #[error("line longer than {limit} bytes")]
    LineTooLong {
        /// Maximum accepted line length
        limit: usize,
    },

    /// `Unknown` frames only exist on the receive path.
    #[error("unknown frames cannot be encoded")]
    Unencodable,
}
