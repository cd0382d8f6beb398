//! Protocol Module
//!
//! Defines the binary frame format shared by every operation.
//!
//! ## Frame Format
//!
//! ### Data Frame
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬─────────────────────┐
//! │ Size (4) │Header (1)│ Route (1)│ Sequence (8) │      Payload        │
//! └──────────┴──────────┴──────────┴──────────────┴─────────────────────┘
//! ```
//!
//! ### Heartbeat Frame
//! ```text
//! ┌──────────┬──────────┐
//! │ Size (4) │Header (1)│
//! └──────────┴──────────┘
//! ```
//!
//! `Size` counts every byte after itself. All integers are big-endian.
//!
//! ### Header Bits
//! - bit 0: data frame
//! - bit 1: heartbeat frame

mod frame;
mod reader;
mod writer;

pub use frame::{pack_heartbeat, Packet};
pub use reader::FrameReader;
pub use writer::{
    size_field, Field, FrameSpec, FrameWriter, SequentialWriter, TypedSink, TypedWriter,
};

/// Width of the size prefix
pub const SIZE_BYTES: usize = 4;

/// Width of the header flags byte
pub const HEADER_BYTES: usize = 1;

/// Width of the route code
pub const ROUTE_BYTES: usize = 1;

/// Width of the sequence number
pub const SEQ_BYTES: usize = 8;

/// Width of a status code
pub const CODE_BYTES: usize = 2;

/// Header flag: frame carries routed data
pub const DATA_BIT: u8 = 1 << 0;

/// Header flag: frame is a keep-alive
pub const HEARTBEAT_BIT: u8 = 1 << 1;

/// Offset of the header byte
pub const HEADER_OFFSET: usize = SIZE_BYTES;

/// Offset of the route code in a data frame
pub const ROUTE_OFFSET: usize = HEADER_OFFSET + HEADER_BYTES;

/// Offset of the sequence number in a data frame
pub const SEQ_OFFSET: usize = ROUTE_OFFSET + ROUTE_BYTES;

/// Size prefix + header + route + sequence
pub const DATA_PREFIX_BYTES: usize = SEQ_OFFSET + SEQ_BYTES;

/// Total length of a heartbeat frame
pub const HEARTBEAT_BYTES: usize = SIZE_BYTES + HEADER_BYTES;

/// Default cap on the size field (16 MB)
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Route codes agreed between peers
pub mod route {
    /// Unbind a user from the session
    pub const UNBIND_REQ: i8 = 5;

    /// Unbind result
    pub const UNBIND_RES: i8 = 6;
}
