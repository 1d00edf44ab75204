//! Command definitions
//!
//! Represents parsed client requests.

use crate::error::{KvError, Result};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a value under a key, replacing any previous value
    Set { key: String, value: Vec<u8> },

    /// Fetch the value stored under a key
    Get { key: String },

    /// Remove a key (no-op if absent)
    Del { key: String },
}

impl Command {
    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
        }
    }

    /// The key this command operates on
    pub fn key(&self) -> &str {
        match self {
            Command::Set { key, .. } | Command::Get { key } | Command::Del { key } => key,
        }
    }

    /// Check that `to_line` yields a line the server parses back into
    /// this same command
    ///
    /// The key must be non-empty and free of whitespace. A SET value must be
    /// non-empty, must not start with whitespace, and must not contain a
    /// line feed.
    pub fn validate(&self) -> Result<()> {
        let key = self.key();
        if key.is_empty() {
            return Err(KvError::InvalidKey("empty key".to_string()));
        }
        if key.bytes().any(|b| b.is_ascii_whitespace() || b == 0x0b) {
            return Err(KvError::InvalidKey(format!("{:?} contains whitespace", key)));
        }

        if let Command::Set { value, .. } = self {
            match value.first() {
                None => {
                    return Err(KvError::Protocol("SET needs a non-empty value".to_string()))
                }
                Some(&b) if b.is_ascii_whitespace() || b == 0x0b => {
                    return Err(KvError::Protocol(
                        "value must not start with whitespace".to_string(),
                    ))
                }
                _ => {}
            }
            if value.contains(&b'\n') {
                return Err(KvError::Protocol(
                    "value must not contain a line feed".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Render the command as a request line, line feed included
    pub fn to_line(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.name().len() + self.key().len() + 2);
        line.extend_from_slice(self.name().as_bytes());
        line.push(b' ');
        line.extend_from_slice(self.key().as_bytes());
        if let Command::Set { value, .. } = self {
            line.push(b' ');
            line.extend_from_slice(value);
        }
        line.push(b'\n');
        line
    }
}
