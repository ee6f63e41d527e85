use avrctl_transport::{TcpTransport, TransportConfig};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::event::Events;
use crate::session::Session;

/// Connect to an appliance at `host:port` with default configuration.
pub async fn connect(host: &str, port: u16) -> Result<(Session, Events)> {
    connect_with_config(host, port, &TransportConfig::default(), SessionConfig::default()).await
}

/// Connect with explicit transport and session configuration.
pub async fn connect_with_config(
    host: &str,
    port: u16,
    transport_config: &TransportConfig,
    session_config: SessionConfig,
) -> Result<(Session, Events)> {
    let stream = TcpTransport::connect_with_config(host, port, transport_config).await?;
    Ok(Session::with_stream(stream, session_config))
}

#[cfg(test)]
mod tests {
    use avrctl_codec::{Tag, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::error::SessionError;
    use crate::event::Event;

    #[tokio::test]
    async fn connect_convenience() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let appliance = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4];
            socket.read_exact(&mut buf).await.unwrap();
            assert_eq!(&buf, b"PW?\r");
            socket.write_all(b"PWON\r").await.unwrap();
            socket
        });

        let (session, mut events) = connect("127.0.0.1", port).await.unwrap();
        assert_eq!(events.recv().await, Some(Event::Connected));
        assert_eq!(session.get(Tag::POWER).await.unwrap(), Value::Switch(true));

        session.close().await;
        drop(appliance.await.unwrap());
    }

    #[tokio::test]
    async fn connect_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = connect("127.0.0.1", port).await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }
}
