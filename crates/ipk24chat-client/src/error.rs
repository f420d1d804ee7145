//! Local validation errors.
//!
//! These never reach the network. The `Display` text is what the user sees
//! after the `ERR: ` prefix.

use thiserror::Error;

/// A line of local input that cannot be acted on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// `/auth` without exactly three arguments.
    #[error("Invalid /auth data! Try again!")]
    InvalidAuth,

    /// `/join` without exactly one argument.
    #[error("Invalid /join data! Try again!")]
    InvalidJoin,

    /// `/rename` without exactly one argument.
    #[error("Invalid /rename data! Try again!")]
    InvalidRename,

    /// Command requires an open session.
    #[error("You are not authenticated!")]
    NotAuthenticated,

    /// `/auth` after the session is already open.
    #[error("Already authenticated!")]
    AlreadyAuthenticated,
}
