//! filekv Server Binary
//!
//! Starts the TCP server for filekv.

use clap::Parser;
use filekv::store::KeyPolicy;
use filekv::{Config, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// filekv Server
#[derive(Parser, Debug)]
#[command(name = "filekv-server")]
#[command(about = "Line-protocol key-value server storing one file per key")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:5000")]
    listen: String,

    /// Directory the key files live in
    #[arg(short, long, default_value = ".")]
    data_dir: String,

    /// Listen backlog
    #[arg(short, long, default_value = "1")]
    backlog: i32,

    /// Maximum value length in bytes
    #[arg(long, default_value = "255")]
    max_value_len: usize,

    /// Per-connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Use keys as paths verbatim, without rejecting separators or `..`
    #[arg(long)]
    allow_unsafe_keys: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filekv::DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("filekv server v{}", filekv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    let key_policy = if args.allow_unsafe_keys {
        tracing::warn!("Key sanitization disabled: keys may name paths outside the data directory");
        KeyPolicy::Permissive
    } else {
        KeyPolicy::Strict
    };

    let config = Config::builder()
        .listen_addr(&args.listen)
        .data_dir(&args.data_dir)
        .backlog(args.backlog)
        .max_value_len(args.max_value_len)
        .read_timeout_ms(args.read_timeout_ms)
        .key_policy(key_policy)
        .build();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
