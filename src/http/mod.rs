//! HTTP protocol implementation.
//!
//! This module implements HTTP/1.1 message framing directly over a raw byte
//! stream, with keep-alive connection handling on the server side.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`line_reader`**: reads CRLF-terminated lines and exact byte counts from a stream
//! - **`framer`**: parses requests/responses from a line reader and serializes them back
//! - **`headers`**: case-insensitive header map
//! - **`request`**: HTTP request representation and keep-alive decision
//! - **`response`**: HTTP response representation with builder pattern
//! - **`connection`**: the per-connection request-response state machine
//! - **`writer`**: serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! Each accepted connection goes through a state machine:
//!
//! ```text
//!        ┌──────────────────┐
//!        │   AwaitRequest   │ ← Wait for the next request line (read timeout)
//!        └──────┬───────────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │    Dispatch      │ ← Hand the request to the router
//!        └──────┬───────────┘
//!               │ Response ready (500 on handler failure)
//!               ▼
//!        ┌──────────────────┐
//!        │    Respond       │ ← Write the response to the client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → AwaitRequest (same connection)
//!               └─ Close / EOF / timeout → Closed
//! ```

pub mod connection;
pub mod framer;
pub mod headers;
pub mod line_reader;
pub mod request;
pub mod response;
pub mod writer;
