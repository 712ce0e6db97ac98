//! HTTP client engine.
//!
//! Sends requests over one reusable connection and follows 301/302 redirects
//! up to a configured bound, replacing the connection when a redirect points
//! at a different host or port.

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::http::framer::{self, FrameError};
use crate::http::headers::Headers;
use crate::http::line_reader::LineReader;
use crate::http::request::Request;
use crate::http::response::Response;

/// Fixed client identifier sent on every request.
pub const USER_AGENT: &str = "courier-client";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The redirect chain exceeded the configured bound. Checked before each
    /// send, so the hop past the bound never reaches the network.
    #[error("redirect limit exceeded after {0} hops")]
    TooManyRedirects(u32),

    #[error("redirect response missing Location header")]
    MissingLocationHeader,

    #[error("invalid redirect target {0:?}")]
    InvalidRedirectTarget(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

struct ClientConnection {
    reader: LineReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    host: String,
    port: u16,
}

impl ClientConnection {
    async fn open(host: &str, port: u16) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: LineReader::new(read_half),
            writer: write_half,
            host: host.to_string(),
            port,
        })
    }
}

/// A client session over one (replaceable) keep-alive connection.
pub struct HttpClient {
    conn: ClientConnection,
    max_redirects: u32,
}

impl HttpClient {
    pub async fn connect(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let conn = ClientConnection::open(&cfg.host, cfg.port).await?;
        info!(host = %cfg.host, port = cfg.port, "connected");

        Ok(Self {
            conn,
            max_redirects: cfg.max_redirects,
        })
    }

    /// Host and port the session is currently connected to.
    pub fn target(&self) -> (&str, u16) {
        (&self.conn.host, self.conn.port)
    }

    /// Sends one request and returns the final response, following 301/302
    /// redirects.
    ///
    /// Each redirect re-sends the same method and body to the resolved
    /// target; a target on another host or port replaces the connection. A
    /// 304 or any other status is returned to the caller unchanged.
    pub async fn send(
        &mut self,
        method: &str,
        path: &str,
        body: &[u8],
        extra_headers: &Headers,
    ) -> Result<Response, ClientError> {
        let mut path = path.to_string();
        let mut hops = 0u32;

        loop {
            if hops > self.max_redirects {
                return Err(ClientError::TooManyRedirects(hops));
            }

            let response = self.exchange(method, &path, body, extra_headers).await?;

            match response.status {
                301 | 302 => {
                    let location = response
                        .headers
                        .get("location")
                        .ok_or(ClientError::MissingLocationHeader)?
                        .to_string();
                    debug!(%location, "following redirect");

                    let (host, port, new_path) = self.resolve_location(&location)?;
                    if host != self.conn.host || port != self.conn.port {
                        // The current connection cannot serve the new target.
                        self.conn = ClientConnection::open(&host, port).await?;
                    }

                    path = new_path;
                    hops += 1;
                }
                _ => return Ok(response),
            }
        }
    }

    async fn exchange(
        &mut self,
        method: &str,
        path: &str,
        body: &[u8],
        extra_headers: &Headers,
    ) -> Result<Response, ClientError> {
        let request = self.build_request(method, path, body, extra_headers);
        let bytes = framer::serialize_request(&request);

        self.conn.writer.write_all(&bytes).await?;
        self.conn.writer.flush().await?;
        debug!(method, path, "request sent");

        Ok(framer::parse_response(&mut self.conn.reader).await?)
    }

    /// Builds the outgoing request with the fixed header set.
    ///
    /// Only a POST carries its body (and the matching Content-Type and
    /// Content-Length headers); bodies passed with other methods are ignored.
    fn build_request(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        extra_headers: &Headers,
    ) -> Request {
        let mut headers = Headers::new();
        headers.insert("Host", format!("{}:{}", self.conn.host, self.conn.port));
        headers.insert("Connection", "keep-alive");
        headers.insert("User-Agent", USER_AGENT);
        for (name, value) in extra_headers.iter() {
            headers.insert(name, value.to_string());
        }

        let send_body = method == "POST" && !body.is_empty();
        if send_body {
            headers.insert("Content-Type", "application/x-www-form-urlencoded");
            headers.insert("Content-Length", body.len().to_string());
        }

        Request {
            method: method.to_string(),
            path: path.to_string(),
            version: framer::HTTP_VERSION.to_string(),
            headers,
            body: if send_body { body.to_vec() } else { Vec::new() },
        }
    }

    /// Resolves a Location header against the current target.
    ///
    /// Targets not starting with "http" are treated as paths on the current
    /// host and port. Only the path component of the resolved URL is
    /// re-requested.
    fn resolve_location(&self, location: &str) -> Result<(String, u16, String), ClientError> {
        let absolute = if location.starts_with("http") {
            location.to_string()
        } else {
            format!("http://{}:{}{}", self.conn.host, self.conn.port, location)
        };

        let url = Url::parse(&absolute)
            .map_err(|_| ClientError::InvalidRedirectTarget(location.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| ClientError::InvalidRedirectTarget(location.to_string()))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(80);

        Ok((host, port, url.path().to_string()))
    }
}
