use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;
use tracing::{debug, error};

use crate::http::framer::{self, FrameError};
use crate::http::line_reader::LineReader;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// One accepted connection, driven through repeated request/response cycles
/// until the peer disconnects, goes idle past the read timeout, or asks for
/// the connection to close.
pub struct Connection {
    reader: LineReader<OwnedReadHalf>,
    write_half: OwnedWriteHalf,
    router: Arc<dyn Router>,
    read_timeout: Duration,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitRequest,
    Dispatch(Request),
    Respond(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<dyn Router>, read_timeout: Duration) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: LineReader::new(read_half),
            write_half,
            router,
            read_timeout,
            state: ConnectionState::AwaitRequest,
        }
    }

    /// Drives the connection state machine to completion.
    ///
    /// Orderly disconnects and idle timeouts end the loop silently; every
    /// other I/O or framing failure is returned to the spawner. The socket is
    /// released on every exit path when the connection is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::AwaitRequest => {
                    match self.await_request().await? {
                        Some(req) => {
                            self.state = ConnectionState::Dispatch(req);
                        }
                        None => {
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Dispatch(req) => {
                    debug!(method = %req.method, path = %req.path, "dispatching request");
                    let keep_alive = req.keep_alive();

                    // A failing handler costs the request a 500, never the
                    // connection.
                    let response = match self.router.handle(req) {
                        Ok(response) => response,
                        Err(e) => {
                            error!(error = %e, "handler failed, responding 500");
                            Response::internal_error()
                        }
                    };

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Respond(writer, keep_alive);
                }

                ConnectionState::Respond(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.write_half).await?;

                    if *keep_alive {
                        self.state = ConnectionState::AwaitRequest; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Waits for the next request, bounded by the read timeout.
    ///
    /// Returns `Ok(None)` on orderly disconnect or timeout; both are expected
    /// ends of a keep-alive connection, not failures.
    async fn await_request(&mut self) -> Result<Option<Request>, FrameError> {
        let start_line = match timeout(self.read_timeout, self.next_start_line()).await {
            Ok(line) => match line? {
                Some(line) => line,
                None => {
                    debug!("peer closed connection");
                    return Ok(None);
                }
            },
            Err(_) => {
                debug!("idle connection timed out");
                return Ok(None);
            }
        };

        let request = framer::parse_request(&start_line, &mut self.reader).await?;
        Ok(Some(request))
    }

    /// Reads until a non-blank line arrives. Stray CRLFs ahead of a request
    /// line are skipped rather than parsed as a request.
    async fn next_start_line(&mut self) -> Result<Option<String>, FrameError> {
        loop {
            match self.reader.read_line().await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line)),
            }
        }
    }
}
