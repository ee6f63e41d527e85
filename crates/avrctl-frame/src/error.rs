/// Errors that can occur during line framing.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An outbound line contains the record separator and would split on the wire.
    #[error("line contains the record separator (\\r): {0:?}")]
    EmbeddedSeparator(String),

    /// An I/O error occurred while writing lines.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
