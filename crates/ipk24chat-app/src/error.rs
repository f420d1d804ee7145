//! Error types for the terminal client.

use std::io;

use ipk24chat_proto::ProtocolError;
use thiserror::Error;

/// Local I/O failures that stop the event loop.
///
/// Transport failures are not errors here: they are reported to the session,
/// which records them and ends in `Failed`.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Writing to stdout or stderr failed.
    #[error("console I/O error: {0}")]
    Console(#[source] io::Error),

    /// The session produced a frame that cannot be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Failures before the event loop starts.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Datagram transport was requested.
    #[error("UDP transport is not supported")]
    UdpUnsupported,

    /// Port outside 1..=65535.
    #[error("invalid port: {0}")]
    InvalidPort(u16),

    /// Hostname lookup failed.
    #[error("failed to resolve hostname {host}: {source}")]
    Resolve {
        /// Hostname as given.
        host: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },

    /// Hostname resolved to no addresses.
    #[error("no addresses found for {host}")]
    NoAddress {
        /// Hostname as given.
        host: String,
    },

    /// Every resolved address refused the connection.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Hostname as given.
        host: String,
        /// Destination port.
        port: u16,
        /// Error from the last attempted address.
        #[source]
        source: io::Error,
    },

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),

    /// The event loop stopped on a local error.
    #[error(transparent)]
    EventLoop(#[from] RuntimeError),
}
