use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

use crate::error::Result;

/// A connected appliance stream; implements `AsyncRead + AsyncWrite`.
///
/// This is the I/O type returned by transport operations. The session layer
/// splits it into read and write halves and owns both exclusively.
pub struct TransportStream {
    inner: TransportStreamInner,
}

enum TransportStreamInner {
    Tcp(TcpStream),
}

impl TransportStream {
    pub(crate) fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: TransportStreamInner::Tcp(stream),
        }
    }

    /// Address of the connected appliance.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        match &self.inner {
            TransportStreamInner::Tcp(stream) => stream.peer_addr().map_err(Into::into),
        }
    }

    /// Local address of this end of the connection.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        match &self.inner {
            TransportStreamInner::Tcp(stream) => stream.local_addr().map_err(Into::into),
        }
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            TransportStreamInner::Tcp(_) => "tcp",
        }
    }
}

impl AsyncRead for TransportStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            TransportStreamInner::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for TransportStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().inner {
            TransportStreamInner::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            TransportStreamInner::Tcp(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            TransportStreamInner::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

impl std::fmt::Debug for TransportStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            TransportStreamInner::Tcp(stream) => f
                .debug_struct("TransportStream")
                .field("type", &"tcp")
                .field("peer", &stream.peer_addr().ok())
                .finish(),
        }
    }
}
