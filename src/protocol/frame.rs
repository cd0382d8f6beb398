//! Frame classification
//!
//! A frame read off the wire is either a heartbeat or a routed data frame.

use bytes::{Buf, Bytes};

use super::writer::{FrameSpec, FrameWriter};
use super::{
    DATA_PREFIX_BYTES, HEADER_BYTES, HEADER_OFFSET, HEARTBEAT_BIT, HEARTBEAT_BYTES, ROUTE_OFFSET,
    SEQ_OFFSET, SIZE_BYTES,
};
use crate::error::{Result, WireError};
use crate::pool::{self, PooledBuffer};

/// One complete frame, raw bytes included
///
/// `data` always holds the full frame starting at the size prefix, so it can
/// be relayed as-is or handed to a packer's unpack function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Keep-alive, no route or sequence
    Heartbeat { data: Bytes },

    /// Routed message
    Data { route: i8, seq: u64, data: Bytes },
}

impl Packet {
    /// Classify a complete frame.
    ///
    /// The size prefix must match the buffer length exactly.
    pub fn from_frame(data: Bytes) -> Result<Self> {
        if data.len() < SIZE_BYTES + HEADER_BYTES {
            return Err(WireError::MalformedFrame(format!(
                "frame too short: {} bytes",
                data.len()
            )));
        }

        let size = (&data[..SIZE_BYTES]).get_u32() as usize;
        if size == 0 || size != data.len() - SIZE_BYTES {
            return Err(WireError::MalformedFrame(format!(
                "size field {} does not match {} available bytes",
                size,
                data.len() - SIZE_BYTES
            )));
        }

        let header = data[HEADER_OFFSET];
        if header & HEARTBEAT_BIT == HEARTBEAT_BIT {
            return Ok(Packet::Heartbeat { data });
        }

        if data.len() < DATA_PREFIX_BYTES {
            return Err(WireError::MalformedFrame(format!(
                "data frame too short for route and sequence: {} bytes",
                data.len()
            )));
        }

        let route = data[ROUTE_OFFSET] as i8;
        let seq = (&data[SEQ_OFFSET..DATA_PREFIX_BYTES]).get_u64();

        Ok(Packet::Data { route, seq, data })
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Packet::Heartbeat { .. })
    }

    /// Route code (data frames only)
    pub fn route(&self) -> Option<i8> {
        match self {
            Packet::Data { route, .. } => Some(*route),
            Packet::Heartbeat { .. } => None,
        }
    }

    /// Sequence number (data frames only)
    pub fn seq(&self) -> Option<u64> {
        match self {
            Packet::Data { seq, .. } => Some(*seq),
            Packet::Heartbeat { .. } => None,
        }
    }

    /// Header flags byte
    pub fn header(&self) -> u8 {
        self.data()[HEADER_OFFSET]
    }

    /// The whole frame, size prefix included
    pub fn data(&self) -> &Bytes {
        match self {
            Packet::Heartbeat { data } | Packet::Data { data, .. } => data,
        }
    }
}

/// Encode a heartbeat frame into a pooled buffer
pub fn pack_heartbeat<W: FrameWriter + ?Sized>(writer: &W) -> Result<PooledBuffer> {
    writer.encode(&pool::shared(HEARTBEAT_BYTES), &FrameSpec::heartbeat())
}
