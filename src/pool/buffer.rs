//! Pooled buffer handle
//!
//! An exclusively owned byte sink that returns itself to its pool.

use std::io;
use std::ops::Deref;
use std::sync::Weak;

use bytes::BytesMut;

use super::PoolInner;

/// A fixed-capacity buffer drawn from a [`BufferPool`](super::BufferPool)
///
/// The handle is the only way to reach the bytes. Relinquishing it, either
/// through [`release`](PooledBuffer::release) or by dropping it, hands the
/// storage back to the origin pool; the borrow checker rules out any use
/// afterwards.
pub struct PooledBuffer {
    /// Backing storage; capacity is at least `frame_len`
    buf: BytesMut,

    /// Usable capacity, never changes
    frame_len: usize,

    /// Origin pool (non-owning, only used to return the storage)
    pool: Weak<PoolInner>,
}

impl PooledBuffer {
    pub(crate) fn new(buf: BytesMut, frame_len: usize, pool: Weak<PoolInner>) -> Self {
        Self { buf, frame_len, pool }
    }

    /// Usable capacity in bytes
    pub fn capacity(&self) -> usize {
        self.frame_len
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left before the buffer is full
    pub fn remaining(&self) -> usize {
        self.frame_len.saturating_sub(self.buf.len())
    }

    /// Check if the buffer holds a complete frame
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.frame_len
    }

    /// Written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..]
    }

    /// Zero-fill to full capacity and expose the whole region for reading into
    pub fn fill_zeroed(&mut self) -> &mut [u8] {
        self.buf.clear();
        self.buf.resize(self.frame_len, 0);
        &mut self.buf[..]
    }

    /// Return the buffer to its pool
    pub fn release(self) {
        drop(self);
    }

    /// Raw storage for writers that check capacity up front
    pub(crate) fn storage_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for PooledBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Bounded sink: refuses to grow past `capacity()`
impl io::Write for PooledBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let n = data.len().min(self.remaining());
        if n == 0 && !data.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("pooled buffer full ({} bytes)", self.frame_len),
            ));
        }

        self.buf.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.upgrade() {
            pool.reclaim(std::mem::take(&mut self.buf));
        }
    }
}

impl std::fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buf.len())
            .field("capacity", &self.frame_len)
            .finish()
    }
}
