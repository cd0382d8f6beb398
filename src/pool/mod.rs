//! Buffer Pool Module
//!
//! Reusable, fixed-capacity write buffers keyed by exact frame length.
//!
//! ## Ownership
//! ```text
//!   BufferPool::acquire()  ──►  PooledBuffer (one owner)
//!                                   │
//!             ┌─────────────────────┴──────────────────┐
//!             ▼                                        ▼
//!   release(self) / drop                  moved into the transport,
//!   (error path, same thread)             released after the write
//!             │                                        │
//!             └──────────────►  free list  ◄───────────┘
//! ```
//!
//! A handle goes back to its pool exactly once: `release` consumes it and
//! `Drop` covers every other exit path, so a relinquished buffer can never be
//! read or released again.

mod buffer;
mod registry;

pub use buffer::PooledBuffer;
pub use registry::{global, PoolRegistry, FRAME_LENGTHS};

pub(crate) use registry::shared;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use crossbeam::queue::SegQueue;

/// Pool of buffers that all hold exactly `frame_len` bytes
///
/// Cloning is cheap and yields a handle to the same free list.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

/// Shared state behind a pool handle
pub(crate) struct PoolInner {
    /// Fixed capacity of every buffer handed out
    frame_len: usize,

    /// Idle buffers (lock-free, safe for concurrent push/pop)
    free: SegQueue<BytesMut>,

    allocated: AtomicUsize,
    reused: AtomicUsize,
    released: AtomicUsize,
}

/// Point-in-time counters for one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Frame length this pool serves
    pub frame_len: usize,

    /// Buffers created on a pool miss
    pub allocated: usize,

    /// Acquisitions served from the free list
    pub reused: usize,

    /// Buffers returned to the free list
    pub released: usize,

    /// Buffers currently idle in the free list
    pub idle: usize,
}

impl BufferPool {
    /// Create an empty pool; buffers are allocated lazily on first demand
    pub fn new(frame_len: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                frame_len,
                free: SegQueue::new(),
                allocated: AtomicUsize::new(0),
                reused: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }),
        }
    }

    /// Capacity of every buffer from this pool
    pub fn frame_len(&self) -> usize {
        self.inner.frame_len
    }

    /// Take a buffer, allocating one if the free list is empty.
    ///
    /// Never blocks and never fails. The returned buffer is empty with
    /// `frame_len` bytes of capacity.
    pub fn acquire(&self) -> PooledBuffer {
        let buf = match self.inner.free.pop() {
            Some(buf) => {
                self.inner.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.inner.allocated.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Pool miss, allocating {} byte buffer", self.inner.frame_len);
                BytesMut::with_capacity(self.inner.frame_len)
            }
        };

        PooledBuffer::new(buf, self.inner.frame_len, Arc::downgrade(&self.inner))
    }

    /// Snapshot the pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            frame_len: self.inner.frame_len,
            allocated: self.inner.allocated.load(Ordering::Relaxed),
            reused: self.inner.reused.load(Ordering::Relaxed),
            released: self.inner.released.load(Ordering::Relaxed),
            idle: self.inner.free.len(),
        }
    }

    /// Both handles point at the same free list
    pub fn same_pool(&self, other: &BufferPool) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PoolInner {
    /// Put a buffer back on the free list, emptied
    pub(crate) fn reclaim(&self, mut buf: BytesMut) {
        // A buffer that lost capacity would break the fixed-length contract
        if buf.capacity() < self.frame_len {
            return;
        }

        buf.clear();
        self.released.fetch_add(1, Ordering::Relaxed);
        self.free.push(buf);
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("frame_len", &self.inner.frame_len)
            .field("idle", &self.inner.free.len())
            .finish()
    }
}
