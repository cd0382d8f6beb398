//! # framewire
//!
//! Binary frame protocol and pooled-buffer codecs for request/response
//! messaging over byte streams:
//! - Length-prefixed frames carrying heartbeats or routed data
//! - Per-operation packers encoding fixed-layout frames
//! - Size-matched buffer pools with ownership-typed handles
//! - Two byte-identical frame writers (sequential / typed)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │                  (Multiple Clients)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Frame Reader                              │
//! │            (heartbeat / data demultiplexer)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ route code
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Router                                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐         ┌─────────────────┐
//!               │    Packers    │────────►│  Frame Writers  │
//!               │ (per route)   │         │ (seq. / typed)  │
//!               └───────┬───────┘         └────────┬────────┘
//!                       │                          │
//!                       ▼                          ▼
//!               ┌─────────────────────────────────────────┐
//!               │     Buffer Pools (keyed by length)      │
//!               └─────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod pool;
pub mod protocol;
pub mod packer;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::{Config, WriterStrategy};
pub use packer::{Packer, Router, UnbindPacker};
pub use pool::{BufferPool, PooledBuffer};
pub use protocol::{FrameReader, Packet};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of framewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
