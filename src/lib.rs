//! Courier - HTTP/1.1 over raw TCP
//!
//! Core library: message framing, a keep-alive server, and a
//! redirect-following client.

pub mod client;
pub mod config;
pub mod http;
pub mod router;
pub mod server;
