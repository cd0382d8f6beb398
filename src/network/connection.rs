//! Framed connection
//!
//! Reads frames from one stream and writes pooled frames to its peer.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, WireError};
use crate::packer::Router;
use crate::pool::PooledBuffer;
use crate::protocol::{pack_heartbeat, FrameReader, FrameWriter, Packet};

/// Connection over a buffered TCP stream
pub type TcpFrameConn = FrameConn<BufReader<TcpStream>, BufWriter<TcpStream>>;

/// Write half, shareable across threads
///
/// `send` takes ownership of the buffer and releases it once the write has
/// completed or failed.
pub struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> SharedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write a whole frame and flush
    pub fn send(&self, buf: PooledBuffer) -> Result<()> {
        let result = {
            let mut writer = self.inner.lock();
            writer.write_all(&buf).and_then(|_| writer.flush())
        };
        buf.release();

        result.map_err(WireError::from)
    }

    /// Pack and send a heartbeat
    pub fn send_heartbeat<F: FrameWriter + ?Sized>(&self, encoder: &F) -> Result<()> {
        self.send(pack_heartbeat(encoder)?)
    }
}

/// One framed stream: a read half owned by this struct, a shared write half
pub struct FrameConn<R, W> {
    reader: R,
    writer: SharedWriter<W>,
    frames: FrameReader,
    peer_addr: String,
}

impl TcpFrameConn {
    /// Wrap an accepted or connected TCP stream.
    ///
    /// Sets up buffered I/O, disables Nagle and applies the configured
    /// timeouts and frame size cap.
    pub fn from_tcp(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let read_stream = stream.try_clone()?;
        let frames = FrameReader::new().with_max_frame_size(config.max_frame_size);

        Ok(Self::new(
            BufReader::new(read_stream),
            BufWriter::new(stream),
            frames,
            peer_addr,
        ))
    }
}

impl<R: Read, W: Write> FrameConn<R, W> {
    pub fn new(reader: R, writer: W, frames: FrameReader, peer_addr: impl Into<String>) -> Self {
        Self {
            reader,
            writer: SharedWriter::new(writer),
            frames,
            peer_addr: peer_addr.into(),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Handle to the write half
    pub fn writer(&self) -> SharedWriter<W> {
        self.writer.clone()
    }

    /// Block until the next frame arrives
    pub fn read_packet(&mut self) -> Result<Packet> {
        self.frames.read_packet(&mut self.reader)
    }

    /// Transmit a packed frame; the buffer is released afterwards
    pub fn send(&self, buf: PooledBuffer) -> Result<()> {
        self.writer.send(buf)
    }

    pub fn send_heartbeat<F: FrameWriter + ?Sized>(&self, encoder: &F) -> Result<()> {
        self.writer.send_heartbeat(encoder)
    }

    /// Serve requests until the peer goes away.
    ///
    /// Heartbeats are answered with heartbeats, data frames go through
    /// `router`. A frame that fails to decode is skipped since the stream is
    /// still aligned; a malformed size field ends the session.
    pub fn serve<F: FrameWriter + ?Sized>(&mut self, router: &Router, encoder: &F) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let packet = match self.read_packet() {
                Ok(packet) => packet,
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let reply = match &packet {
                Packet::Heartbeat { .. } => {
                    tracing::trace!("Heartbeat from {}", self.peer_addr);
                    pack_heartbeat(encoder)
                }
                Packet::Data { route, seq, data } => {
                    tracing::trace!("Request route={} seq={} from {}", route, seq, self.peer_addr);
                    router.dispatch(*route, data)
                }
            };

            let reply = match reply {
                Ok(buf) => buf,
                Err(e) => {
                    tracing::warn!("Dropping frame from {}: {}", self.peer_addr, e);
                    continue;
                }
            };

            if let Err(e) = self.send(reply) {
                if e.is_disconnect() {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }
}
