use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{FrameError, Result};
use crate::framer::{split_line, SEPARATOR};

/// Encode one line into wire format (`<line>\r`).
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────────────────┬──────┐
/// │ Tag (2B)  │ Body (0..n bytes)    │ \r   │
/// └───────────┴──────────────────────┴──────┘
/// ```
pub fn encode_line(line: &str, dst: &mut BytesMut) -> Result<()> {
    if line.as_bytes().contains(&SEPARATOR) {
        return Err(FrameError::EmbeddedSeparator(line.to_string()));
    }
    dst.reserve(line.len() + 1);
    dst.put_slice(line.as_bytes());
    dst.put_u8(SEPARATOR);
    Ok(())
}

/// `tokio_util` codec for carriage-return terminated lines.
///
/// The session writes through `FramedWrite<_, LineCodec>`; decoding shares
/// the splitting rule of [`LineFramer`](crate::LineFramer).
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCodec;

impl LineCodec {
    pub fn new() -> Self {
        Self
    }
}

impl<'a> Encoder<&'a str> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &'a str, dst: &mut BytesMut) -> Result<()> {
        encode_line(item, dst)
    }
}

impl Encoder<String> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<()> {
        encode_line(&item, dst)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        Ok(split_line(src).map(|line| String::from_utf8_lossy(&line).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;

    #[test]
    fn test_encode_query() {
        let mut buf = BytesMut::new();
        encode_line("PW?", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"PW?\r");
    }

    #[test]
    fn test_encode_rejects_embedded_separator() {
        let mut buf = BytesMut::new();
        let err = encode_line("PWON\rMUON", &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::EmbeddedSeparator(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_appends() {
        let mut buf = BytesMut::new();
        let mut codec = LineCodec::new();
        codec.encode("MVUP", &mut buf).unwrap();
        codec.encode(String::from("MV415"), &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"MVUP\rMV415\r");
    }

    #[test]
    fn test_decode_waits_for_separator() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"SITV"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.as_ref(), b"SITV");

        buf.extend_from_slice(b"\rPW");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("SITV"));
        assert_eq!(buf.as_ref(), b"PW");
    }

    #[tokio::test]
    async fn test_framed_roundtrip_over_duplex() {
        let (client, server) = tokio::io::duplex(64);
        let mut writer = FramedWrite::new(client, LineCodec::new());
        let mut reader = FramedRead::new(server, LineCodec::new());

        writer.send("PW?").await.unwrap();
        writer.send("MVDOWN").await.unwrap();

        assert_eq!(reader.next().await.unwrap().unwrap(), "PW?");
        assert_eq!(reader.next().await.unwrap().unwrap(), "MVDOWN");
    }
}
