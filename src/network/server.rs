//! TCP Server
//!
//! Accepts connections and serves each one to completion before the next.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use super::Connection;

/// TCP server for filekv
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Validate the config, open the store, and start listening
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let engine = Arc::new(Engine::open(&config)?);
        let addr = config.socket_addr()?;
        let listener = bind_listener(addr, config.backlog)
            .map_err(|e| KvError::Network(format!("failed to listen on {}: {}", addr, e)))?;

        let local_addr = listener.local_addr()?;
        tracing::info!("Server listening on port {}...", local_addr.port());

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that can stop `run` from another thread
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr()?,
        })
    }

    /// Accept and serve connections until shut down (blocking)
    ///
    /// Per-connection failures are logged and never stop the loop.
    pub fn run(&self) -> Result<()> {
        while !self.shutdown.load(Ordering::Acquire) {
            let stream = match self.listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) => {
                    tracing::warn!("accept failed: {}", e);
                    continue;
                }
            };

            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            self.serve(stream);
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    fn serve(&self, stream: TcpStream) {
        let mut connection = match Connection::new(
            stream,
            Arc::clone(&self.engine),
            self.config.max_line_len,
            self.config.limits(),
        ) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("Failed to set up connection: {}", e);
                return;
            }
        };

        let result = connection
            .set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)
            .and_then(|_| connection.handle());
        if let Err(e) = result {
            tracing::warn!("Error serving {}: {}", connection.peer_addr(), e);
        }
    }
}

/// Stops a running server from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop
    ///
    /// A throwaway connection wakes the blocked `accept`.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);

        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            wake.set_ip(match wake.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }
        if let Err(e) = TcpStream::connect(wake) {
            tracing::debug!("Shutdown wake-up connection failed: {}", e);
        }
    }
}

/// Build a listener with an explicit backlog
fn bind_listener(addr: SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    Ok(socket.into())
}
