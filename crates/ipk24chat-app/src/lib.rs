//! Terminal client for IPK24-CHAT
//!
//! Drives the [`ipk24chat_client::Session`] state machine against a real TCP
//! stream, standard input and the process's interrupt signal.
//!
//! # Components
//!
//! - [`EventLoop`]: `tokio::select!` multiplexer over input, network and
//!   interrupts
//! - [`InterruptBridge`]: turns Ctrl-C into a token the loop waits on
//! - [`Console`]: routes output lines to stdout or stderr
//! - [`connect`]: hostname resolution and TCP connect

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod console;
mod error;
mod interrupt;
mod runtime;
mod transport;

pub use console::Console;
pub use error::{ClientError, RuntimeError};
pub use interrupt::{InterruptBridge, InterruptNotifier, forward_ctrl_c};
pub use runtime::{EventLoop, Outcome};
pub use transport::{ClientConfig, DEFAULT_PORT, connect};
