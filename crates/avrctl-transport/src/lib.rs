//! Byte-stream transport for networked A/V receivers.
//!
//! The appliance exposes its control protocol over a plain TCP socket
//! (port 23 by default). This crate only connects and hands back a
//! [`TransportStream`]; framing and protocol logic live in the layers above.
//! Telnet option negotiation is not performed.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::TransportStream;
pub use tcp::{TcpTransport, TransportConfig, DEFAULT_PORT};
