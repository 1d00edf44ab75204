//! Engine Module
//!
//! Executes parsed commands against the file store.
//!
//! ## Responsibilities
//! - Own the store built from the config
//! - Map each command onto a store operation
//! - Report results in a shape the connection can turn into a response

use crate::config::Config;
use crate::error::Result;
use crate::protocol::Command;
use crate::store::FileStore;

/// The command executor
pub struct Engine {
    /// File-backed storage
    store: FileStore,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// Creates the data directory if it does not exist.
    pub fn open(config: &Config) -> Result<Self> {
        let store = FileStore::open(&config.data_dir, config.key_policy, config.max_value_len)?;
        tracing::debug!("Store opened at {}", store.root().display());
        Ok(Self { store })
    }

    /// Execute a command
    ///
    /// Returns `Some(value)` for GET and `None` for SET/DEL.
    /// A missing key on GET is `KvError::KeyNotFound`.
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Set { key, value } => {
                self.store.set(&key, &value)?;
                Ok(None)
            }
            Command::Get { key } => self.store.get(&key).map(Some),
            Command::Del { key } => {
                self.store.delete(&key)?;
                Ok(None)
            }
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.store.get(key)
    }

    /// Set a key/value pair
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.store.set(key, value)
    }

    /// Delete a key
    pub fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key)
    }
}
