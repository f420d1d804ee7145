//! Client
//!
//! Action-based session state machine for the IPK24-CHAT protocol. Decides,
//! for every line of local input and every inbound frame, what is legal in the
//! current state, which frame to emit, and what the user sees.
//!
//! # Architecture
//!
//! The session is Sans-IO. It receives events ([`SessionEvent`]), processes
//! them through pure state machine logic, and returns actions
//! ([`SessionAction`]) for the caller to execute against the transport and the
//! terminal. Send results are fed back as [`SessionEvent::SendFailed`].
//!
//! # Components
//!
//! - [`Session`]: the state machine
//! - [`Command`]: parsed line of local input
//! - [`SessionEvent`]: events fed into the session
//! - [`SessionAction`]: actions produced by the session
//! - [`Output`]: user-visible lines

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
mod error;
mod event;
mod output;
mod session;

pub use command::Command;
pub use error::CommandError;
pub use event::{SessionAction, SessionEvent};
pub use ipk24chat_proto::Message;
pub use output::{HELP_TEXT, Output, OutputStream};
pub use session::{INVALID_PEER_MESSAGE, Identity, PEER_CLOSED_MESSAGE, Session, SessionState};
