//! Wire-level message framing.
//!
//! Turns the line/byte stream exposed by [`LineReader`] into [`Request`] and
//! [`Response`] values and serializes them back into wire bytes. Framing is
//! Content-Length only; chunked transfer-encoding is out of scope.

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::http::headers::Headers;
use crate::http::line_reader::LineReader;
use crate::http::request::Request;
use crate::http::response::Response;

/// Version written on every serialized response status line.
pub const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer closed the stream before the declared body length arrived.
    #[error("stream ended after {got} of {expected} body bytes")]
    TruncatedBody { expected: usize, got: usize },

    /// The response status line had no parsable numeric code.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// The stream ended while a status line or headers were still expected.
    #[error("stream ended while reading headers")]
    UnexpectedEndOfStream,

    /// A header value the client must trust could not be parsed.
    #[error("malformed {name} header: {value:?}")]
    MalformedHeader { name: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses a request whose start line has already been read.
///
/// The start line is split on whitespace into method, path, and version;
/// a missing path defaults to "/". Header lines without a colon are skipped.
/// A missing or unparsable Content-Length is treated as zero: the server
/// serves such a request as body-less rather than rejecting it.
pub async fn parse_request<R: AsyncRead + Unpin>(
    start_line: &str,
    reader: &mut LineReader<R>,
) -> Result<Request, FrameError> {
    let mut parts = start_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").to_string();
    let version = parts.next().unwrap_or("").to_string();

    // A request cut off mid-headers is still served with what arrived.
    let headers = read_headers(reader, false).await?;

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let body = reader.read_exact(content_length).await?;

    Ok(Request {
        method,
        path,
        version,
        headers,
        body,
    })
}

/// Parses a full response, status line included.
///
/// Unlike the server-side request path, the client is strict: a stream that
/// ends while the status line or headers are still expected fails with
/// [`FrameError::UnexpectedEndOfStream`], and an unparsable Content-Length is
/// a [`FrameError::MalformedHeader`] rather than a zero-length body.
pub async fn parse_response<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
) -> Result<Response, FrameError> {
    let status_line = reader
        .read_line()
        .await?
        .ok_or(FrameError::UnexpectedEndOfStream)?;

    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| FrameError::MalformedStatusLine(status_line.clone()))?;
    let reason = parts.next().unwrap_or("").to_string();

    let headers = read_headers(reader, true).await?;

    let content_length = match headers.get("content-length") {
        None => 0,
        Some(v) => v.parse::<usize>().map_err(|_| FrameError::MalformedHeader {
            name: "content-length".to_string(),
            value: v.to_string(),
        })?,
    };
    let body = reader.read_exact(content_length).await?;

    Ok(Response {
        status,
        reason,
        headers,
        body,
    })
}

/// Reads header lines until the blank separator line.
///
/// Names are stored lower-cased, values trimmed; duplicate names keep the
/// last value. With `strict_eof`, a stream ending before the separator is an
/// error; otherwise the headers collected so far are returned.
async fn read_headers<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
    strict_eof: bool,
) -> Result<Headers, FrameError> {
    let mut headers = Headers::new();

    loop {
        match reader.read_line().await? {
            None if strict_eof => return Err(FrameError::UnexpectedEndOfStream),
            None => return Ok(headers),
            Some(line) if line.is_empty() => return Ok(headers),
            Some(line) => {
                if let Some((name, value)) = line.split_once(':') {
                    if !name.trim().is_empty() {
                        headers.insert(name.trim(), value.trim().to_string());
                    }
                }
            }
        }
    }
}

/// Serializes a request into wire bytes.
pub fn serialize_request(req: &Request) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(format!("{} {} {}\r\n", req.method, req.path, req.version).as_bytes());
    write_headers(&mut buf, &req.headers);
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&req.body);

    buf
}

/// Serializes a response into wire bytes.
///
/// The body is appended as-is, with no re-encoding.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(format!("{} {} {}\r\n", HTTP_VERSION, resp.status, resp.reason).as_bytes());
    write_headers(&mut buf, &resp.headers);
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&resp.body);

    buf
}

fn write_headers(buf: &mut Vec<u8>, headers: &Headers) {
    for (name, value) in headers.iter() {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parse_simple_get() {
        let mut reader = LineReader::new(&b"Host: example.com\r\n\r\n"[..]);
        let req = parse_request("GET / HTTP/1.1", &mut reader).await.unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/");
        assert_eq!(req.headers.get("host"), Some("example.com"));
    }
}
