//! Network Module
//!
//! TCP server and client connection handling.
//!
//! ## Architecture
//! - One listener with a small backlog
//! - Connections served strictly one at a time on the accept thread
//! - One request and one response per connection

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
