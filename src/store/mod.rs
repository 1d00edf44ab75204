//! Store Module
//!
//! File-backed key/value storage.
//!
//! ## Layout
//! Each key is one file directly under the data directory, named exactly
//! as the key. The file's entire content is the value; there is no framing,
//! metadata, or trailing newline. A key exists iff its file exists.
//!
//! ## Concurrency
//! Operations on the same key are serialized through a per-key lock.
//! Different keys never contend.

mod key;
mod file;

pub use key::{KeyPolicy, validate_key};
pub use file::FileStore;
