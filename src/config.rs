//! Configuration for filekv
//!
//! Centralized configuration with defaults matching the classic fixed
//! constants (port 5000, 512-byte request line, 255-byte keys and values).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{KvError, Result};
use crate::store::KeyPolicy;

/// Main configuration for a filekv server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Listen backlog passed to `listen(2)`
    pub backlog: i32,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Limits
    // -------------------------------------------------------------------------
    /// Request line capacity in bytes, including the line feed
    pub max_line_len: usize,

    /// Width of the command token
    pub max_command_len: usize,

    /// Width of the key token
    pub max_key_len: usize,

    /// Width of the value token, also the most bytes GET returns
    pub max_value_len: usize,

    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory keys are resolved against
    pub data_dir: PathBuf,

    /// How keys are checked before touching the filesystem
    pub key_policy: KeyPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            backlog: 1,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_line_len: 512,
            max_command_len: 7,
            max_key_len: 255,
            max_value_len: 255,
            data_dir: PathBuf::from("."),
            key_policy: KeyPolicy::Strict,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check limits and the listen address before anything is bound
    pub fn validate(&self) -> Result<()> {
        if self.backlog <= 0 {
            return Err(KvError::Config(format!(
                "backlog must be positive, got {}",
                self.backlog
            )));
        }

        let limits = [
            ("max_line_len", self.max_line_len),
            ("max_command_len", self.max_command_len),
            ("max_key_len", self.max_key_len),
            ("max_value_len", self.max_value_len),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(KvError::Config(format!("{} must be non-zero", name)));
            }
        }

        self.socket_addr()?;
        Ok(())
    }

    /// Parse `listen_addr` into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            KvError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })
    }

    /// Token widths used by the request parser
    pub fn limits(&self) -> crate::protocol::Limits {
        crate::protocol::Limits {
            command: self.max_command_len,
            key: self.max_key_len,
            value: self.max_value_len,
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the listen backlog
    pub fn backlog(mut self, backlog: i32) -> Self {
        self.config.backlog = backlog;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the request line capacity (in bytes, including the line feed)
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    pub fn max_command_len(mut self, len: usize) -> Self {
        self.config.max_command_len = len;
        self
    }

    pub fn max_key_len(mut self, len: usize) -> Self {
        self.config.max_key_len = len;
        self
    }

    pub fn max_value_len(mut self, len: usize) -> Self {
        self.config.max_value_len = len;
        self
    }

    /// Set the data directory keys are stored under
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the key validation policy
    pub fn key_policy(mut self, policy: KeyPolicy) -> Self {
        self.config.key_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
