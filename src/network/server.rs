//! TCP Server
//!
//! Accepts connections and serves each on its own thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use super::TcpFrameConn;
use crate::config::Config;
use crate::error::Result;
use crate::packer::Router;

/// TCP server answering framed requests
pub struct Server {
    config: Config,
    router: Arc<Router>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Stops a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop accepting
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
        // Wake the blocking accept
        let _ = TcpStream::connect(self.addr);
    }
}

/// Decrements the live connection count when a session ends
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Server {
    /// Bind the listener described by `config`
    pub fn bind(config: Config, router: Router) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            router: Arc::new(router),
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr()?,
        })
    }

    /// Number of sessions currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Accept connections until shut down (blocking)
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };

            if self.active.load(Ordering::Acquire) >= self.config.max_connections {
                tracing::warn!(
                    "Connection limit {} reached, refusing {:?}",
                    self.config.max_connections,
                    stream.peer_addr().ok()
                );
                continue;
            }

            self.active.fetch_add(1, Ordering::AcqRel);
            let guard = ActiveGuard(Arc::clone(&self.active));
            let router = Arc::clone(&self.router);
            let config = self.config.clone();

            thread::spawn(move || {
                let _guard = guard;
                let mut conn = match TcpFrameConn::from_tcp(stream, &config) {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!("Failed to set up connection: {}", e);
                        return;
                    }
                };

                if let Err(e) = conn.serve(&router, &config.writer_strategy) {
                    tracing::debug!("Session with {} ended: {}", conn.peer_addr(), e);
                }
            });
        }

        tracing::info!("Server stopped accepting");
        Ok(())
    }
}
