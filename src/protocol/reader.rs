//! Frame reader
//!
//! Pulls one complete frame at a time off a blocking byte stream.

use std::io::Read;

use bytes::{Buf, Bytes};

use super::{Packet, DEFAULT_MAX_FRAME_SIZE, SIZE_BYTES};
use crate::error::{Result, WireError};
use crate::pool::{self, BufferPool};

/// Stream demultiplexer
///
/// Holds no per-stream state, only the shared pool for the 4-byte size
/// scratch. Reads from a given stream must be made by a single owner, one
/// after another.
#[derive(Debug, Clone)]
pub struct FrameReader {
    size_pool: BufferPool,
    max_frame_size: u32,
}

impl FrameReader {
    /// Reader backed by the process-wide size-scratch pool
    pub fn new() -> Self {
        Self {
            size_pool: pool::shared(SIZE_BYTES),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Reader with a caller-supplied scratch pool (must hold 4-byte buffers)
    pub fn with_pool(size_pool: BufferPool) -> Result<Self> {
        if size_pool.frame_len() != SIZE_BYTES {
            return Err(WireError::Config(format!(
                "size scratch pool must hold {} byte buffers, got {}",
                SIZE_BYTES,
                size_pool.frame_len()
            )));
        }

        Ok(Self {
            size_pool,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        })
    }

    /// Refuse frames whose size field exceeds `max`
    pub fn with_max_frame_size(mut self, max: u32) -> Self {
        self.max_frame_size = max;
        self
    }

    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    /// Read the next frame.
    ///
    /// Blocks until a full frame or an I/O error is available. Short reads
    /// surface as `WireError::Io`; a zero or oversized size field is
    /// rejected before any payload is read.
    pub fn read_packet<R: Read + ?Sized>(&self, reader: &mut R) -> Result<Packet> {
        let mut scratch = self.size_pool.acquire();

        if let Err(e) = reader.read_exact(scratch.fill_zeroed()) {
            scratch.release();
            return Err(e.into());
        }

        let size = scratch.as_slice().get_u32();

        if size == 0 {
            scratch.release();
            tracing::warn!("Rejecting frame with zero size field");
            return Err(WireError::MalformedFrame("zero frame size".to_string()));
        }

        if size > self.max_frame_size {
            scratch.release();
            tracing::warn!("Rejecting {} byte frame (max {})", size, self.max_frame_size);
            return Err(WireError::MalformedFrame(format!(
                "frame size {} exceeds maximum {}",
                size, self.max_frame_size
            )));
        }

        let mut data = vec![0u8; SIZE_BYTES + size as usize];
        data[..SIZE_BYTES].copy_from_slice(&scratch);
        scratch.release();

        // A partial frame is dropped here, it never came from a pool
        reader.read_exact(&mut data[SIZE_BYTES..])?;

        let packet = Packet::from_frame(Bytes::from(data))?;
        tracing::trace!(
            "Read {} frame ({} bytes)",
            if packet.is_heartbeat() { "heartbeat" } else { "data" },
            size
        );

        Ok(packet)
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
