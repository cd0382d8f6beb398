//! Pool registry
//!
//! One pool per exact frame length, built once and shared read-only.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{BufferPool, PoolStats};
use crate::error::{Result, WireError};
use crate::packer::unbind;
use crate::protocol::{HEARTBEAT_BYTES, SIZE_BYTES};

/// Every frame length the process-wide registry serves
pub const FRAME_LENGTHS: [usize; 4] = [
    SIZE_BYTES,
    HEARTBEAT_BYTES,
    unbind::REQUEST_BYTES,
    unbind::RESPONSE_BYTES,
];

/// Fixed set of pools keyed by frame length
#[derive(Debug)]
pub struct PoolRegistry {
    pools: HashMap<usize, BufferPool>,
}

impl PoolRegistry {
    /// Build a registry with one pool per distinct length
    pub fn new(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut pools = HashMap::new();
        for len in lengths {
            pools.entry(len).or_insert_with(|| BufferPool::new(len));
        }

        Self { pools }
    }

    /// Pool for an exact frame length
    pub fn pool(&self, frame_len: usize) -> Result<BufferPool> {
        self.pools
            .get(&frame_len)
            .cloned()
            .ok_or_else(|| WireError::Config(format!("no pool registered for {} byte frames", frame_len)))
    }

    /// Registered frame lengths, ascending
    pub fn frame_lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self.pools.keys().copied().collect();
        lengths.sort_unstable();
        lengths
    }

    /// Counters for every pool, ordered by frame length
    pub fn stats(&self) -> Vec<PoolStats> {
        let mut stats: Vec<PoolStats> = self.pools.values().map(BufferPool::stats).collect();
        stats.sort_unstable_by_key(|s| s.frame_len);
        stats
    }
}

/// Shared pool for one of the built-in frame lengths
pub(crate) fn shared(frame_len: usize) -> BufferPool {
    global()
        .pool(frame_len)
        .expect("FRAME_LENGTHS covers every built-in frame length")
}

/// Process-wide registry, created on first use
pub fn global() -> &'static PoolRegistry {
    static REGISTRY: OnceLock<PoolRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        tracing::debug!("Initializing buffer pools for frame lengths {:?}", FRAME_LENGTHS);
        PoolRegistry::new(FRAME_LENGTHS)
    })
}
