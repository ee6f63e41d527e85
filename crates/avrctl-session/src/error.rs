use std::time::Duration;

use avrctl_codec::{CodecError, Tag, Value};

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] avrctl_transport::TransportError),

    /// Writing a line failed.
    #[error("frame error: {0}")]
    Frame(#[from] avrctl_frame::FrameError),

    /// Encoding a setting or decoding a response failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// No correlated response arrived in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A response decoded to a value of the wrong kind for the accessor.
    #[error("unexpected value for {tag}: {value:?}")]
    UnexpectedValue { tag: Tag, value: Value },

    /// The session was closed locally.
    #[error("session closed")]
    Closed,

    /// The appliance closed the connection or the read side failed.
    #[error("appliance disconnected: {0}")]
    Disconnected(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
