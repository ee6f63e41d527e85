use crate::tag::Tag;

/// Errors produced while encoding settings or decoding response bodies.
///
/// `Clone` so decode failures can ride on broadcast notifications.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// The caller's value is outside the tag's domain.
    #[error("unsupported value for {tag}: {value}")]
    UnsupportedValue { tag: Tag, value: String },

    /// The appliance sent a body the tag's codec cannot parse.
    #[error("malformed {tag} response {body:?}: {reason}")]
    MalformedResponse {
        tag: Tag,
        body: String,
        reason: String,
    },

    /// A numeric value is outside the representable window or granularity.
    #[error("{value} is out of range for {tag}")]
    OutOfRange { tag: Tag, value: f64 },

    /// Setting a tag that has no codec entry.
    #[error("setting values is not supported for {0}")]
    UnknownTag(Tag),

    /// A tag string that is not two ASCII characters.
    #[error("invalid tag {0:?} (expected two ASCII characters)")]
    InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
