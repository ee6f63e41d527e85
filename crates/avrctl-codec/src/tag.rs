use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CodecError;

/// Two-character command tag (`PW`, `MV`, ...), always stored uppercase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 2]);

impl Tag {
    /// Power (`PW`).
    pub const POWER: Tag = Tag(*b"PW");
    /// Mute (`MU`).
    pub const MUTE: Tag = Tag(*b"MU");
    /// Input source (`SI`).
    pub const INPUT_SOURCE: Tag = Tag(*b"SI");
    /// Master volume (`MV`).
    pub const MASTER_VOLUME: Tag = Tag(*b"MV");
    /// Sleep timer (`SL`).
    pub const SLEEP_TIMER: Tag = Tag(*b"SL");

    /// Parse a tag, normalizing to uppercase.
    pub fn new(text: &str) -> Result<Self, CodecError> {
        match text.as_bytes() {
            [a, b] if is_tag_byte(*a) && is_tag_byte(*b) => {
                Ok(Tag([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(CodecError::InvalidTag(text.to_string())),
        }
    }

    /// Split a protocol line into its tag and body.
    ///
    /// Returns `None` when the line is shorter than two bytes or its first two
    /// bytes are not printable ASCII; such lines carry no extractable tag.
    pub fn split_line(line: &str) -> Option<(Tag, &str)> {
        let bytes = line.as_bytes();
        if bytes.len() < 2 || !is_tag_byte(bytes[0]) || !is_tag_byte(bytes[1]) {
            return None;
        }
        let tag = Tag([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase()]);
        Some((tag, &line[2..]))
    }

    /// The tag as text.
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII bytes.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// The query line for this tag (`PW?`).
    pub fn query(&self) -> String {
        format!("{}?", self.as_str())
    }

    /// A command line carrying `body` (`PWON`).
    pub fn command(&self, body: &str) -> String {
        format!("{}{}", self.as_str(), body)
    }
}

fn is_tag_byte(byte: u8) -> bool {
    byte.is_ascii_graphic()
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.as_str())
    }
}

impl FromStr for Tag {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
