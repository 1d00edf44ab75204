//! filekv CLI Client
//!
//! Command-line interface for interacting with a filekv server.

use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use filekv::protocol::{read_response, write_command, Command, Response};
use tracing_subscriber::{fmt, EnvFilter};

/// filekv CLI
#[derive(Parser, Debug)]
#[command(name = "filekv-cli")]
#[command(about = "CLI for the filekv key-value server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Get { key } => Command::Get { key },
            Commands::Set { key, value } => Command::Set {
                key,
                value: value.join(" ").into_bytes(),
            },
            Commands::Del { key } => Command::Del { key },
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let command = Command::from(args.command);
    if let Err(e) = command.validate() {
        eprintln!("Refusing to send {}: {}", command.name(), e);
        return ExitCode::FAILURE;
    }

    match send(&args.server, &command) {
        Ok(Response::Ok) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Ok(Response::Value(value)) => {
            println!("{}", String::from_utf8_lossy(&value));
            ExitCode::SUCCESS
        }
        Ok(Response::NotFound) => {
            eprintln!("(not found)");
            ExitCode::FAILURE
        }
        Ok(Response::Error) => {
            eprintln!("ERROR");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Request to {} failed: {}", args.server, e);
            ExitCode::FAILURE
        }
    }
}

/// Send one command and wait for the server to reply and close
fn send(addr: &str, command: &Command) -> filekv::Result<Response> {
    let mut stream = TcpStream::connect(addr)?;
    tracing::debug!("Connected to {}", addr);
    write_command(&mut stream, command)?;
    read_response(&mut stream)
}
