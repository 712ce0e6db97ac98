use crate::http::headers::Headers;

/// Represents a parsed HTTP request.
///
/// Contains all information extracted from the request line and headers. The
/// method is kept as the raw token: routing decides what to do with unknown
/// methods (typically 405), so parsing never rejects one.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method token (e.g. "GET", "POST")
    pub method: String,
    /// The request path (e.g. "/index")
    pub path: String,
    /// HTTP version from the request line (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, matched case-insensitively
    pub headers: Headers,
    /// Request body for POST/PUT requests
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<String>,
    path: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.unwrap_or_else(|| "/".to_string()),
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number; a request
    /// with an unreadable length is served as if it had no body.
    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Determines whether the connection should remain open after the
    /// response.
    ///
    /// `Connection: close` closes, `Connection: keep-alive` keeps the
    /// connection open, and with no explicit header the HTTP/1.1 default is
    /// keep-alive while every other version closes.
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::request::RequestBuilder;
    /// let req = RequestBuilder::new().method("GET").build().unwrap();
    /// assert!(req.keep_alive());
    ///
    /// let req = RequestBuilder::new()
    ///     .method("GET")
    ///     .version("HTTP/1.0")
    ///     .build()
    ///     .unwrap();
    /// assert!(!req.keep_alive());
    /// ```
    pub fn keep_alive(&self) -> bool {
        match self.header("connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version == "HTTP/1.1",
        }
    }
}
