//! Named-offset field extraction
//!
//! Fixed-layout frames are decoded by reading each field at a constant offset
//! from the frame start or the frame end, never by sequential parsing.

use std::ops::Range;

use bytes::Buf;

use crate::error::{Result, WireError};

/// Where a field sits in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Field starts this many bytes into the frame
    Start(usize),

    /// Field starts this many bytes before the end of the frame
    End(usize),
}

impl Anchor {
    /// Byte range of a `width`-byte field in a `frame_len`-byte frame
    pub fn range(self, frame_len: usize, width: usize) -> Option<Range<usize>> {
        let start = match self {
            Anchor::Start(offset) => offset,
            Anchor::End(back) => frame_len.checked_sub(back)?,
        };
        let end = start.checked_add(width)?;

        (end <= frame_len).then_some(start..end)
    }
}

/// Reject anything but an exact-length frame
pub fn expect_len(data: &[u8], expected: usize, what: &str) -> Result<()> {
    if data.len() != expected {
        return Err(WireError::MalformedFrame(format!(
            "{}: expected {} bytes, got {}",
            what,
            expected,
            data.len()
        )));
    }
    Ok(())
}

fn field(data: &[u8], at: Anchor, width: usize) -> Result<&[u8]> {
    at.range(data.len(), width)
        .map(|r| &data[r])
        .ok_or_else(|| {
            WireError::MalformedFrame(format!(
                "{} byte field at {:?} outside {} byte frame",
                width,
                at,
                data.len()
            ))
        })
}

pub fn read_u64(data: &[u8], at: Anchor) -> Result<u64> {
    Ok(field(data, at, 8)?.get_u64())
}

pub fn read_i64(data: &[u8], at: Anchor) -> Result<i64> {
    Ok(field(data, at, 8)?.get_i64())
}

pub fn read_i16(data: &[u8], at: Anchor) -> Result<i16> {
    Ok(field(data, at, 2)?.get_i16())
}
