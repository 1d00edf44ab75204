//! File-backed store
//!
//! One file per key under a root directory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{KvError, Result};
use super::{validate_key, KeyPolicy};

/// Key/value store keeping each value in its own file
pub struct FileStore {
    /// Directory keys are resolved against
    root: PathBuf,

    /// Key validation policy
    policy: KeyPolicy,

    /// Most bytes returned by `get`
    max_value_len: usize,

    /// One lock per in-flight key name
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>, policy: KeyPolicy, max_value_len: usize) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            policy,
            max_value_len,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `value` as the whole content of the key's file
    ///
    /// Existing content is truncated. Nothing is fsynced.
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        self.with_key_lock(key, || {
            let mut file = File::create(&path)?;
            file.write_all(value)?;
            tracing::trace!("Stored {} bytes at {}", value.len(), path.display());
            Ok(())
        })
    }

    /// Read up to `max_value_len` bytes of the key's file
    ///
    /// A file that cannot be opened is reported as `KeyNotFound`. A file
    /// that opens but fails to read (a directory, say) yields whatever was
    /// read before the failure, usually nothing.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        self.with_key_lock(key, || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::trace!("Cannot open {}: {}", path.display(), e);
                    return Err(KvError::KeyNotFound);
                }
            };

            let mut value = Vec::with_capacity(self.max_value_len);
            if let Err(e) = file.take(self.max_value_len as u64).read_to_end(&mut value) {
                tracing::debug!("Short read of {}: {}", path.display(), e);
            }
            Ok(value)
        })
    }

    /// Remove the key's file
    ///
    /// Removal failures (including a missing file) are ignored.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.with_key_lock(key, || {
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!("Ignoring failed removal of {}: {}", path.display(), e);
                }
            }
            Ok(())
        })
    }

    /// Number of keys with a live lock entry
    pub fn tracked_keys(&self) -> usize {
        self.locks.lock().len()
    }

    /// Resolve a key to its backing file
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key, self.policy)?;
        Ok(self.root.join(key))
    }

    /// Run `op` holding the key's lock
    ///
    /// The entry is dropped from the table once no other caller holds or
    /// waits on it, so the table only grows with in-flight keys.
    fn with_key_lock<T>(&self, key: &str, op: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(key.to_string()).or_default())
        };

        let result = {
            let _guard = lock.lock();
            op()
        };

        let mut locks = self.locks.lock();
        // one reference in the table, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
        result
    }
}
