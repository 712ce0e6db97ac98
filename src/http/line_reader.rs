use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::framer::FrameError;

/// Reads CRLF-delimited lines and exact byte counts from a stream.
///
/// This is the single framing primitive both sides of the protocol are built
/// on: start lines and headers arrive as lines, bodies as an exact number of
/// bytes announced by `Content-Length`. Bytes read past the current message
/// stay buffered for the next one, so a reader must live as long as its
/// connection.
pub struct LineReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(4096),
        }
    }

    /// Reads one line, stripping the trailing CRLF.
    ///
    /// Returns `Ok(None)` when the stream ends before any byte of the line
    /// arrived: the peer closed at a message boundary, which is not an error.
    /// A stream ending after partial line content yields that content as a
    /// final line.
    pub async fn read_line(&mut self) -> Result<Option<String>, FrameError> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line = self.buf.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            let n = self.inner.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let line = self.buf.split();
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
        }
    }

    /// Reads exactly `n` bytes, looping until satisfied.
    ///
    /// `n = 0` returns an empty buffer without touching the stream. A stream
    /// that ends short of `n` bytes fails with [`FrameError::TruncatedBody`].
    pub async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, FrameError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        while self.buf.len() < n {
            let read = self.inner.read_buf(&mut self.buf).await?;
            if read == 0 {
                return Err(FrameError::TruncatedBody {
                    expected: n,
                    got: self.buf.len(),
                });
            }
        }

        Ok(self.buf.split_to(n).to_vec())
    }
}
