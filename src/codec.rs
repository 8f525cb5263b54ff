//! Line codec for chat connections
//!
//! Wraps `LinesCodec`. On the read side, a line that is too long or is not
//! valid UTF-8 becomes `Inbound::Skipped` instead of an error, so one bad
//! line does not end the stream. On the write side it frames notification
//! lines and can emit the terminal sequence that erases the client's echo.

use std::fmt;
use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::outbox::Line;

/// Cursor up one line, then clear that line
pub const ERASE_ECHO: &[u8] = b"\x1b[1A\x1b[2K";

/// One decoded unit of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A complete line, without its terminator
    Line(String),
    /// A line that could not be used
    Skipped(SkipReason),
}

/// Why an input line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooLong,
    InvalidUtf8,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLong => write!(f, "line too long"),
            SkipReason::InvalidUtf8 => write!(f, "invalid UTF-8"),
        }
    }
}

/// One unit of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A notification line; the codec appends the newline
    Line(Line),
    /// The echo-erase sequence, written raw
    EraseEcho,
}

/// Newline-delimited chat codec
#[derive(Debug, Clone)]
pub struct ChatCodec {
    lines: LinesCodec,
}

impl ChatCodec {
    /// Create a codec accepting input lines of at most `max_line_length` bytes
    pub fn new(max_line_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_line_length),
        }
    }

    fn classify(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<Inbound>, LinesCodecError> {
        match result {
            Ok(line) => Ok(line.map(Inbound::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                Ok(Some(Inbound::Skipped(SkipReason::TooLong)))
            }
            // LinesCodec has already consumed the offending line here.
            Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                Ok(Some(Inbound::Skipped(SkipReason::InvalidUtf8)))
            }
            Err(e) => Err(e),
        }
    }
}

impl Decoder for ChatCodec {
    type Item = Inbound;
    type Error = LinesCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        Self::classify(self.lines.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        Self::classify(self.lines.decode_eof(src))
    }
}

impl Encoder<Outbound> for ChatCodec {
    type Error = LinesCodecError;

    fn encode(&mut self, item: Outbound, dst: &mut BytesMut) -> Result<(), LinesCodecError> {
        match item {
            Outbound::Line(line) => self.lines.encode(&*line, dst),
            Outbound::EraseEcho => {
                dst.extend_from_slice(ERASE_ECHO);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut ChatCodec, input: &[u8]) -> Vec<Inbound> {
        let mut buf = BytesMut::from(input);
        let mut out = Vec::new();
        while let Some(item) = codec.decode(&mut buf).unwrap() {
            out.push(item);
        }
        out
    }

    #[test]
    fn test_decode_lines() {
        let mut codec = ChatCodec::new(64);
        let items = decode_all(&mut codec, b"hello\r\n\n/bell\n");
        assert_eq!(
            items,
            vec![
                Inbound::Line("hello".to_string()),
                Inbound::Line(String::new()),
                Inbound::Line("/bell".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_waits_for_newline() {
        let mut codec = ChatCodec::new(64);
        let mut buf = BytesMut::from(&b"partial"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b" line\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Inbound::Line("partial line".to_string()))
        );
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let mut codec = ChatCodec::new(64);
        let items = decode_all(&mut codec, b"\xff\xfe\nafter\n");
        assert_eq!(
            items,
            vec![
                Inbound::Skipped(SkipReason::InvalidUtf8),
                Inbound::Line("after".to_string()),
            ]
        );
    }

    #[test]
    fn test_long_line_is_skipped_and_reading_resumes() {
        let mut codec = ChatCodec::new(8);
        let mut buf = BytesMut::from(&b"this line is far too long\nok\n"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Inbound::Skipped(SkipReason::TooLong))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Inbound::Line("ok".to_string()))
        );
    }

    #[test]
    fn test_decode_eof_returns_unterminated_line() {
        let mut codec = ChatCodec::new(64);
        let mut buf = BytesMut::from(&b"bye"[..]);
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(Inbound::Line("bye".to_string()))
        );
    }

    #[test]
    fn test_encode() {
        let mut codec = ChatCodec::new(64);
        let mut buf = BytesMut::new();

        codec
            .encode(Outbound::Line(Line::from("Alice: hello")), &mut buf)
            .unwrap();
        codec.encode(Outbound::EraseEcho, &mut buf).unwrap();

        assert_eq!(&buf[..], b"Alice: hello\n\x1b[1A\x1b[2K");
    }
}
