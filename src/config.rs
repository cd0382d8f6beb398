//! Configuration for framewire
//!
//! Centralized configuration with sensible defaults.

use crate::protocol::DEFAULT_MAX_FRAME_SIZE;

/// Main configuration for a framewire endpoint
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Largest `size` field the frame reader accepts
    pub max_frame_size: u32,

    /// Interval between keep-alive heartbeats (milliseconds, 0 = disabled)
    pub heartbeat_interval_ms: u64,

    /// Encoding strategy used by packers built from this config
    pub writer_strategy: WriterStrategy,
}

/// Which frame writer packers use
///
/// Both produce identical bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterStrategy {
    /// Stream-style writes through `std::io::Write`
    Sequential,

    /// Typed put methods, no per-field error
    Typed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3553".to_string(),
            max_connections: 1024,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            heartbeat_interval_ms: 10_000,
            writer_strategy: WriterStrategy::Sequential,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the largest accepted frame `size`
    pub fn max_frame_size(mut self, size: u32) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set the heartbeat interval (in milliseconds)
    pub fn heartbeat_interval_ms(mut self, ms: u64) -> Self {
        self.config.heartbeat_interval_ms = ms;
        self
    }

    /// Set the writer strategy
    pub fn writer_strategy(mut self, strategy: WriterStrategy) -> Self {
        self.config.writer_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
