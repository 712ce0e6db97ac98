//! Request dispatch.
//!
//! Routing is a collaborator behind a trait: the connection loop hands over a
//! parsed request and gets back a complete response. Failures are error
//! values, which the caller maps to a generic 500.

use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder};

pub trait Router: Send + Sync {
    /// Produces the response for one fully-parsed request.
    ///
    /// An `Err` return is recovered by the connection loop with a 500
    /// response; the connection itself stays open.
    fn handle(&self, request: &Request) -> anyhow::Result<Response>;
}

/// Default route table.
pub struct SimpleRouter;

impl Router for SimpleRouter {
    fn handle(&self, request: &Request) -> anyhow::Result<Response> {
        let response = match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/") | ("GET", "/index") => Response::ok_text("Hello from courier"),
            ("GET", "/hello") => Response::ok_text("hello world"),
            ("GET", _) => Response::not_found(),
            ("POST", "/echo") => {
                let mut body = b"echo:".to_vec();
                body.extend_from_slice(&request.body);
                ResponseBuilder::new(200, "OK")
                    .header("Content-Type", "text/plain; charset=utf-8")
                    .body(body)
                    .build()
            }
            _ => Response::method_not_allowed(),
        };

        Ok(response)
    }
}
