use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::TransportStream;

/// Default control port of the appliance (telnet).
pub const DEFAULT_PORT: u16 = 23;

/// Configuration for establishing a TCP connection.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on the connect attempt. `None` waits for the OS timeout.
    pub connect_timeout: Option<Duration>,
    /// Disable Nagle's algorithm. Commands are tiny and latency matters.
    pub nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(5)),
            nodelay: true,
        }
    }
}

/// TCP transport.
pub struct TcpTransport;

impl TcpTransport {
    /// Connect to `host:port` with default configuration.
    pub async fn connect(host: &str, port: u16) -> Result<TransportStream> {
        Self::connect_with_config(host, port, &TransportConfig::default()).await
    }

    /// Connect to `host:port` with explicit configuration.
    pub async fn connect_with_config(
        host: &str,
        port: u16,
        config: &TransportConfig,
    ) -> Result<TransportStream> {
        let addr = format!("{host}:{port}");
        debug!(%addr, "connecting");

        let connect = TcpStream::connect((host, port));
        let stream = match config.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| TransportError::ConnectTimeout {
                    addr: addr.clone(),
                    timeout,
                })?,
            None => connect.await,
        }
        .map_err(|source| TransportError::Connect {
            addr: addr.clone(),
            source,
        })?;

        if config.nodelay {
            stream.set_nodelay(true)?;
        }

        info!(%addr, "connected to appliance");
        Ok(TransportStream::from_tcp(stream))
    }
}
