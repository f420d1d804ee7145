//! Connection setup.

use tokio::net::{TcpStream, lookup_host};

use crate::ClientError;

/// Default server port.
pub const DEFAULT_PORT: u16 = 4567;

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Hostname or IP address.
    pub server: String,
    /// Destination port, 1..=65535.
    pub port: u16,
}

impl ClientConfig {
    /// Build a config, rejecting port 0.
    pub fn new(server: impl Into<String>, port: u16) -> Result<Self, ClientError> {
        if port == 0 {
            return Err(ClientError::InvalidPort(port));
        }
        Ok(Self { server: server.into(), port })
    }
}

/// Resolve `config.server` and connect to the first address that accepts.
///
/// # Errors
///
/// - `ClientError::Resolve` if the hostname cannot be looked up
/// - `ClientError::NoAddress` if the lookup returns nothing
/// - `ClientError::Connect` with the last attempt's error if every address fails
pub async fn connect(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    let addrs = lookup_host((config.server.as_str(), config.port))
        .await
        .map_err(|source| ClientError::Resolve { host: config.server.clone(), source })?;

    let mut last_err = None;
    for addr in addrs {
        tracing::debug!(%addr, "connecting");
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                if let Err(err) = stream.set_nodelay(true) {
                    tracing::debug!(%err, "failed to disable Nagle");
                }
                tracing::debug!(%addr, "connected");
                return Ok(stream);
            },
            Err(err) => {
                tracing::debug!(%addr, %err, "connect failed");
                last_err = Some(err);
            },
        }
    }

    match last_err {
        Some(source) => Err(ClientError::Connect {
            host: config.server.clone(),
            port: config.port,
            source,
        }),
        None => Err(ClientError::NoAddress { host: config.server.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn port_zero_is_rejected() {
        assert!(matches!(ClientConfig::new("localhost", 0), Err(ClientError::InvalidPort(0))));
        assert!(ClientConfig::new("localhost", DEFAULT_PORT).is_ok());
    }

    #[tokio::test]
    async fn connects_to_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ClientConfig::new("127.0.0.1", port).unwrap();
        let (stream, accepted) = tokio::join!(connect(&config), listener.accept());

        assert!(stream.is_ok());
        assert!(accepted.is_ok());
    }

    #[tokio::test]
    async fn refused_connection_reports_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::new("127.0.0.1", port).unwrap();
        assert!(matches!(connect(&config).await, Err(ClientError::Connect { .. })));
    }
}
