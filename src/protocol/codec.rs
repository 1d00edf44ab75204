//! Protocol codec
//!
//! Line framing, request tokenizing, and response encoding/decoding.
//!
//! ## Tokenizing
//!
//! A request line is split into at most three tokens:
//! ```text
//! ┌────────────┬─────────────┬──────────────────────────────┐
//! │ cmd (<=7)  │ key (<=255) │ value (<=255, rest of line)  │
//! └────────────┴─────────────┴──────────────────────────────┘
//! ```
//! `cmd` and `key` are runs of non-whitespace cut at their width; a token
//! longer than its width spills into the next one. `value` starts after the
//! next whitespace run and takes everything up to the line feed.

use std::io::{ErrorKind, Read, Write};

use crate::error::{KvError, Result};
use super::{Command, Response};

/// Token widths for the request parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub command: usize,
    pub key: usize,
    pub value: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            command: 7,
            key: 255,
            value: 255,
        }
    }
}

// =============================================================================
// Line Framing
// =============================================================================

/// Read one request line, a byte at a time
///
/// Stops after a line feed (which is kept) or once `max_line_len` bytes
/// have been read; a full buffer counts as a complete line. Returns
/// `Ok(None)` if the peer closes before either happens.
pub fn read_line<R: Read>(reader: &mut R, max_line_len: usize) -> Result<Option<Vec<u8>>> {
    let mut line = Vec::with_capacity(max_line_len);
    let mut byte = [0u8; 1];

    while line.len() < max_line_len {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(line))
}

// =============================================================================
// Request Parsing
// =============================================================================

/// Whitespace as the C locale classifies it
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Cursor over a request line
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && is_space(self.input[self.pos]) {
            self.pos += 1;
        }
    }

    fn slice(&self, start: usize) -> Option<&'a [u8]> {
        let input = self.input;
        if self.pos > start {
            Some(&input[start..self.pos])
        } else {
            None
        }
    }

    /// Next run of non-whitespace, at most `width` bytes
    fn word(&mut self, width: usize) -> Option<&'a [u8]> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.input.len()
            && self.pos - start < width
            && !is_space(self.input[self.pos])
        {
            self.pos += 1;
        }
        self.slice(start)
    }

    /// Everything up to the next line feed, at most `width` bytes
    fn rest_of_line(&mut self, width: usize) -> Option<&'a [u8]> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.input.len()
            && self.pos - start < width
            && self.input[self.pos] != b'\n'
        {
            self.pos += 1;
        }
        self.slice(start)
    }
}

/// Parse a request line into a command
///
/// The line ends at the first NUL byte. Fewer than two tokens, an unknown
/// command, or a known command with the wrong number of tokens is a
/// `Protocol` error.
pub fn parse_line(line: &[u8], limits: &Limits) -> Result<Command> {
    let line = match line.iter().position(|&b| b == 0) {
        Some(end) => &line[..end],
        None => line,
    };

    let mut scanner = Scanner::new(line);
    let cmd = scanner.word(limits.command);
    let key = cmd.and_then(|_| scanner.word(limits.key));
    let value = key.and_then(|_| scanner.rest_of_line(limits.value));

    let (cmd, key) = match (cmd, key) {
        (Some(cmd), Some(key)) => (cmd, key),
        _ => {
            return Err(KvError::Protocol(
                "expected at least a command and a key".to_string(),
            ))
        }
    };

    let key = String::from_utf8(key.to_vec())
        .map_err(|_| KvError::Protocol("key is not valid UTF-8".to_string()))?;

    match (cmd, value) {
        (b"SET", Some(value)) => Ok(Command::Set {
            key,
            value: value.to_vec(),
        }),
        (b"GET", None) => Ok(Command::Get { key }),
        (b"DEL", None) => Ok(Command::Del { key }),
        (b"SET" | b"GET" | b"DEL", _) => Err(KvError::Protocol(format!(
            "wrong number of arguments for {}",
            String::from_utf8_lossy(cmd)
        ))),
        _ => Err(KvError::Protocol(format!(
            "unknown command: {}",
            String::from_utf8_lossy(cmd)
        ))),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a response to a stream
///
/// `write_all` retries partial writes until every byte is sent.
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&response.encode())?;
    writer.flush()?;
    Ok(())
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&command.to_line())?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
///
/// The server closes the connection after replying, so this reads to EOF.
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_response(&bytes)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    match bytes {
        b"OK\n" => Ok(Response::Ok),
        b"NOTFOUND\n" => Ok(Response::NotFound),
        b"ERROR\n" => Ok(Response::Error),
        _ => match bytes.strip_prefix(b"OK\n").and_then(|rest| rest.strip_suffix(b"\n")) {
            Some(value) => Ok(Response::Value(value.to_vec())),
            None if bytes.is_empty() => Err(KvError::Protocol(
                "connection closed without a response".to_string(),
            )),
            None => Err(KvError::Protocol(format!(
                "unrecognized response: {:?}",
                String::from_utf8_lossy(bytes)
            ))),
        },
    }
}
