//! Inbound line framing.
//!
//! Decoding never fails on content: invalid UTF-8 is replaced lossily and an
//! over-long line becomes [`Frame::Overflow`] instead of a codec error, so
//! the framed reader keeps going with the next line.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

/// One unit of inbound traffic.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A line without its `\n` or `\r\n` terminator.
    Line(String),
    /// A line longer than the limit; its bytes are skipped up to the next `\n`.
    Overflow,
}

pub(crate) struct LineDecoder {
    inner: AnyDelimiterCodec,
}

impl LineDecoder {
    pub(crate) fn new(max_len: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_len),
        }
    }
}

fn to_frame(decoded: Result<Option<Bytes>, AnyDelimiterCodecError>) -> std::io::Result<Option<Frame>> {
    match decoded {
        Ok(Some(chunk)) => {
            let text = String::from_utf8_lossy(&chunk);
            let line = text.strip_suffix('\r').unwrap_or(&text[..]);
            Ok(Some(Frame::Line(line.to_string())))
        }
        Ok(None) => Ok(None),
        Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Ok(Some(Frame::Overflow)),
        Err(AnyDelimiterCodecError::Io(e)) => Err(e),
    }
}

impl Decoder for LineDecoder {
    type Item = Frame;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, Self::Error> {
        to_frame(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, Self::Error> {
        to_frame(self.inner.decode_eof(buf))
    }
}
