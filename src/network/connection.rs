//! Connection Handler
//!
//! Serves a single request/response exchange on a client connection.

use std::io::{self, BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::{parse_line, read_line, write_response, Command, Limits, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader
    reader: BufReader<TcpStream>,

    /// TCP stream writer
    writer: BufWriter<TcpStream>,

    /// Reference to the command engine
    engine: Arc<Engine>,

    /// Request line capacity
    max_line_len: usize,

    /// Token widths for parsing
    limits: Limits,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(
        stream: TcpStream,
        engine: Arc<Engine>,
        max_line_len: usize,
        limits: Limits,
    ) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            max_line_len,
            limits,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves the socket blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection
    ///
    /// Reads one line, executes it, and writes one response. A client that
    /// goes away before sending a full line gets no response. The socket is
    /// closed when the connection is dropped.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let line = match read_line(&mut self.reader, self.max_line_len) {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("Client {} closed before sending a full line", self.peer_addr);
                return Ok(());
            }
            Err(KvError::Io(ref e)) if is_disconnect(e) || is_timeout(e) => {
                tracing::debug!("Dropping client {}: {}", self.peer_addr, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let response = match parse_line(&line, &self.limits) {
            Ok(command) => {
                tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);
                self.execute_command(command)
            }
            Err(e) => {
                tracing::debug!("Rejected request from {}: {}", self.peer_addr, e);
                Response::Error
            }
        };

        if let Err(e) = write_response(&mut self.writer, &response) {
            if let KvError::Io(ref io_err) = e {
                if is_disconnect(io_err) || is_timeout(io_err) {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
            }
            return Err(e);
        }

        Ok(())
    }

    /// Execute a command and return a response
    fn execute_command(&self, command: Command) -> Response {
        match self.engine.execute(command) {
            Ok(Some(value)) => Response::Value(value),
            Ok(None) => Response::Ok,
            Err(KvError::KeyNotFound) => Response::NotFound,
            Err(e) => {
                tracing::debug!("Command from {} failed: {}", self.peer_addr, e);
                Response::Error
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

// Windows reports TimedOut where Unix reports WouldBlock
fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
