//! Tests for the TCP server
//!
//! These tests run a real server on an ephemeral port and verify:
//! - The request/response protocol end to end
//! - One request per connection
//! - Silent close on incomplete requests
//! - The server surviving misbehaving clients

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};

use filekv::network::{Server, ShutdownHandle};
use filekv::{Config, KvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    dir: TempDir,
    addr: SocketAddr,
    handle: ShutdownHandle,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .listen_addr("127.0.0.1:0")
            .data_dir(temp.path())
            .build();
        Self::start_with(temp, config)
    }

    fn start_with(temp: TempDir, config: Config) -> Self {
        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.shutdown_handle().unwrap();
        let thread = thread::spawn(move || server.run().unwrap());
        Self {
            dir: temp,
            addr,
            handle,
            thread: Some(thread),
        }
    }

    /// Send raw bytes, half-close, and collect everything the server sends
    fn request(&self, bytes: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.write_all(bytes).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        response
    }

    fn send(&self, line: &str) -> String {
        String::from_utf8(self.request(line.as_bytes())).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// =============================================================================
// Protocol Scenario Tests
// =============================================================================

#[test]
fn test_set_get_del_get_scenario() {
    let server = TestServer::start();

    assert_eq!(server.send("SET greeting hello world\n"), "OK\n");
    assert_eq!(server.send("GET greeting\n"), "OK\nhello world\n");
    assert_eq!(server.send("DEL greeting\n"), "OK\n");
    assert_eq!(server.send("GET greeting\n"), "NOTFOUND\n");
}

#[test]
fn test_value_stored_as_file() {
    let server = TestServer::start();

    assert_eq!(server.send("SET k some value\n"), "OK\n");

    let content = std::fs::read(server.dir.path().join("k")).unwrap();
    assert_eq!(content, b"some value");
}

#[test]
fn test_overwrite_shorter_value() {
    let server = TestServer::start();

    server.send("SET k a long first value\n");
    server.send("SET k v2\n");

    assert_eq!(server.send("GET k\n"), "OK\nv2\n");
}

#[test]
fn test_del_missing_key_is_ok() {
    let server = TestServer::start();

    assert_eq!(server.send("DEL missing\n"), "OK\n");
    assert_eq!(server.send("GET missing\n"), "NOTFOUND\n");
}

#[test]
fn test_malformed_requests_get_error() {
    let server = TestServer::start();

    assert_eq!(server.send("GET\n"), "ERROR\n");
    assert_eq!(server.send("SET k\n"), "ERROR\n");
    assert_eq!(server.send("FOO K\n"), "ERROR\n");
    assert_eq!(server.send("GET a b\n"), "ERROR\n");
    assert_eq!(server.send("\n"), "ERROR\n");
}

#[test]
fn test_traversal_key_gets_error() {
    let server = TestServer::start();

    assert_eq!(server.send("SET ../escape v\n"), "ERROR\n");
    assert_eq!(server.send("GET ../escape\n"), "ERROR\n");
}

#[test]
fn test_full_buffer_without_line_feed_is_a_command() {
    let server = TestServer::start();

    let mut line = b"SET padded ".to_vec();
    line.resize(512, b'p');
    assert_eq!(server.request(&line), b"OK\n");

    let response = server.send("GET padded\n");
    assert_eq!(response, format!("OK\n{}\n", "p".repeat(255)));
}

#[cfg(unix)]
#[test]
fn test_get_on_directory_returns_empty_value() {
    let server = TestServer::start();
    std::fs::create_dir(server.dir.path().join("subdir")).unwrap();

    assert_eq!(server.send("GET subdir\n"), "OK\n\n");
}

// =============================================================================
// Connection Handling Tests
// =============================================================================

#[test]
fn test_incomplete_line_gets_no_response() {
    let server = TestServer::start();

    assert!(server.request(b"SET k v").is_empty());
    assert!(server.request(b"").is_empty());

    // The server is still serving, and the partial SET did nothing
    assert_eq!(server.send("GET k\n"), "NOTFOUND\n");
}

#[test]
fn test_connection_closed_after_one_response() {
    let server = TestServer::start();

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.write_all(b"SET a 1\n").unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    assert_eq!(response, b"OK\n");
}

#[test]
fn test_server_survives_client_that_hangs_up() {
    let server = TestServer::start();

    {
        let mut stream = TcpStream::connect(server.addr).unwrap();
        stream.write_all(b"GET k\n").unwrap();
        // dropped without reading the response
    }
    {
        let _stream = TcpStream::connect(server.addr).unwrap();
        // dropped without sending anything
    }

    assert_eq!(server.send("SET k v\n"), "OK\n");
    assert_eq!(server.send("GET k\n"), "OK\nv\n");
}

#[test]
fn test_read_timeout_frees_the_server() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .data_dir(temp.path())
        .read_timeout_ms(100)
        .build();
    let server = TestServer::start_with(temp, config);

    let _silent = TcpStream::connect(server.addr).unwrap();

    assert_eq!(server.send("DEL k\n"), "OK\n");
}

#[test]
fn test_bind_rejects_invalid_config() {
    let config = Config::builder().listen_addr("nowhere").build();

    assert!(matches!(Server::bind(config), Err(KvError::Config(_))));
}

#[test]
fn test_bind_reports_address_in_use() {
    let server = TestServer::start();
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .listen_addr(server.addr.to_string())
        .data_dir(temp.path())
        .build();

    assert!(matches!(Server::bind(config), Err(KvError::Network(_))));
}
