use crate::http::headers::Headers;

/// Represents a complete HTTP response.
///
/// The status is the raw numeric code rather than an enum: the client has to
/// carry any code a server sends back to the caller unchanged, including ones
/// this crate never produces itself.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: u16,
    /// The reason phrase accompanying the status code
    pub reason: String,
    /// Response headers, matched case-insensitively
    pub headers: Headers,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use courier::http::response::ResponseBuilder;
/// let response = ResponseBuilder::new(200, "OK")
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.headers.get("content-length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    status: u16,
    reason: String,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the given status line.
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds the Content-Length header from the body size if not already
    /// present, so a built response always frames correctly on the wire.
    pub fn build(mut self) -> Response {
        if !self.headers.contains("content-length") {
            self.headers
                .insert("Content-Length", self.body.len().to_string());
        }

        Response {
            status: self.status,
            reason: self.reason,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with a plain-text body.
    pub fn ok_text(text: impl Into<String>) -> Self {
        ResponseBuilder::new(200, "OK")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(text.into().into_bytes())
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(404, "Not Found")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(b"404 Not Found".to_vec())
            .build()
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(405, "Method Not Allowed")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(b"405 Method Not Allowed".to_vec())
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(500, "Internal Server Error")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(b"500 Internal Server Error".to_vec())
            .build()
    }

    /// Creates a 301 Moved Permanently response pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        ResponseBuilder::new(301, "Moved Permanently")
            .header("Location", location)
            .build()
    }
}
