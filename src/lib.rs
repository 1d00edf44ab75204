//! # filekv
//!
//! A minimal TCP key-value server with:
//! - A line-based text protocol (SET, GET, DEL)
//! - One request per connection, served strictly in order
//! - One file per key, named after the key
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one connection at a time, backlog 1)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  read line → parse
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │                (command dispatch)                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │   FileStore   │
//!               │ (file per key)│
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of filekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used by the server when `RUST_LOG` is unset
///
/// Only the start-up banner and warnings; per-connection events are `debug`.
pub const DEFAULT_LOG_FILTER: &str = "info";
