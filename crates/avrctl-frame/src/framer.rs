use bytes::{Buf, BytesMut};
use tracing::trace;

/// Record separator used by the appliance in both directions.
pub const SEPARATOR: u8 = b'\r';

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Accumulates raw chunks and yields complete lines.
///
/// The unterminated suffix of the most recent chunk is retained across calls
/// until a separator arrives, so chunk boundaries (including a separator that
/// lands in its own chunk) never lose or split data.
#[derive(Debug)]
pub struct LineFramer {
    partial: BytesMut,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self {
            partial: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Feed a chunk and return every line it completes, in order.
    ///
    /// Returned lines never contain the separator. Empty lines (two adjacent
    /// separators) are returned as empty strings; callers decide whether they
    /// matter. Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(line) = split_line(&mut self.partial) {
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        trace!(
            complete = lines.len(),
            buffered = self.partial.len(),
            "fed chunk"
        );
        lines
    }

    /// Number of bytes waiting for a separator.
    pub fn buffered_len(&self) -> usize {
        self.partial.len()
    }

    /// The retained partial line, for diagnostics.
    pub fn partial(&self) -> &[u8] {
        &self.partial
    }

    /// Discard the retained partial line.
    pub fn clear(&mut self) {
        self.partial.clear();
    }
}

/// Remove and return the first complete line in `buf`, without its separator.
///
/// Returns `None` (leaving `buf` untouched) when no separator is buffered yet.
pub(crate) fn split_line(buf: &mut BytesMut) -> Option<BytesMut> {
    let end = buf.iter().position(|&b| b == SEPARATOR)?;
    let line = buf.split_to(end);
    buf.advance(1);
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_split_across_chunks() {
        let mut framer = LineFramer::new();

        let first = framer.feed(b"PW ON\rMU OF");
        assert_eq!(first, vec!["PW ON".to_string()]);
        assert_eq!(framer.partial(), b"MU OF");

        let second = framer.feed(b"F\r");
        assert_eq!(second, vec!["MU OFF".to_string()]);
        assert_eq!(framer.buffered_len(), 0);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"PWON\rMUOFF\rSITUNER\rMV415\r");
        assert_eq!(lines, vec!["PWON", "MUOFF", "SITUNER", "MV415"]);
        assert_eq!(framer.buffered_len(), 0);
    }

    #[test]
    fn test_byte_by_byte_feed() {
        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for byte in b"MVMAX 98\rPWSTANDBY\r" {
            lines.extend(framer.feed(&[*byte]));
        }
        assert_eq!(lines, vec!["MVMAX 98", "PWSTANDBY"]);
    }

    #[test]
    fn test_separator_in_its_own_chunk() {
        let mut framer = LineFramer::new();
        assert!(framer.feed(b"SICD").is_empty());
        assert_eq!(framer.feed(b"\r"), vec!["SICD"]);
        assert!(framer.feed(b"").is_empty());
    }

    #[test]
    fn test_empty_lines_are_preserved() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"\r\rPWON\r");
        assert_eq!(lines, vec!["", "", "PWON"]);
    }

    #[test]
    fn test_partial_without_separator_is_retained() {
        let mut framer = LineFramer::new();
        assert!(framer.feed(b"MV4").is_empty());
        assert!(framer.feed(b"1").is_empty());
        assert_eq!(framer.partial(), b"MV41");

        framer.clear();
        assert_eq!(framer.buffered_len(), 0);
        assert_eq!(framer.feed(b"5\r"), vec!["5"]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut framer = LineFramer::new();
        let text = "SIcafé\r".as_bytes();
        let (head, tail) = text.split_at(6);
        assert!(framer.feed(head).is_empty());
        assert_eq!(framer.feed(tail), vec!["SIcafé"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_dropped() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"SI\xffX\r");
        assert_eq!(lines, vec!["SI\u{fffd}X"]);
    }
}
