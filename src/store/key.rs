//! Key validation
//!
//! Keys become filenames, so they are checked before any path is built.

use crate::error::{KvError, Result};

/// How keys are checked before they are turned into paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Reject keys that could escape the data directory
    #[default]
    Strict,

    /// Use keys verbatim as relative paths (no sanitization)
    Permissive,
}

/// Check a key against a policy
///
/// `Strict` rejects empty keys, `.`, `..`, and any key containing `/`,
/// `\` or NUL. `Permissive` only rejects empty keys and NUL, which no
/// filesystem can name.
pub fn validate_key(key: &str, policy: KeyPolicy) -> Result<()> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("empty key".to_string()));
    }
    if key.contains('\0') {
        return Err(KvError::InvalidKey(format!("{:?} contains NUL", key)));
    }

    match policy {
        KeyPolicy::Permissive => Ok(()),
        KeyPolicy::Strict => {
            if key == "." || key == ".." {
                return Err(KvError::InvalidKey(format!("{:?} is reserved", key)));
            }
            if key.contains(['/', '\\']) {
                return Err(KvError::InvalidKey(format!(
                    "{:?} contains a path separator",
                    key
                )));
            }
            Ok(())
        }
    }
}
