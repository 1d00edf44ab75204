//! Protocol Module
//!
//! Defines the line-based text protocol spoken over TCP.
//!
//! ## Request Format
//! One request per connection, terminated by a line feed:
//! ```text
//! <CMD> <KEY>[ <VALUE>]\n
//! ```
//!
//! ### Commands
//! - SET: key + value (value may contain spaces)
//! - GET: key only
//! - DEL: key only
//!
//! ## Response Format
//! ```text
//! SET: "OK\n" | "ERROR\n"
//! GET: "OK\n<VALUE>\n" | "NOTFOUND\n"
//! DEL: "OK\n"
//! malformed or unknown: "ERROR\n"
//! ```
//!
//! The server closes the connection after every response.

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::Response;
pub use codec::{
    Limits, read_line, parse_line, write_response, write_command, read_response,
    decode_response,
};
