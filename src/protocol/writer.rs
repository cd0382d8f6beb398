//! Frame writers
//!
//! Two independent encoders for the same wire format:
//!
//! - [`SequentialWriter`] streams each field through `std::io::Write`, so any
//!   sink failure aborts the frame.
//! - [`TypedWriter`] checks the layout against the buffer once and then uses
//!   infallible typed put methods ([`TypedSink`]).
//!
//! Output is byte-identical; the wire format is the contract, not either
//! implementation.

use std::io::{self, Write};

use bytes::{BufMut, BytesMut};

use super::{DATA_BIT, HEADER_BYTES, HEARTBEAT_BIT, SIZE_BYTES};
use crate::config::WriterStrategy;
use crate::error::{Result, WireError};
use crate::pool::{BufferPool, PooledBuffer};

/// A fixed-width big-endian field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
}

impl Field {
    /// Encoded width in bytes
    pub const fn width(&self) -> usize {
        match self {
            Field::U8(_) | Field::I8(_) => 1,
            Field::U16(_) | Field::I16(_) => 2,
            Field::U32(_) | Field::I32(_) => 4,
            Field::U64(_) | Field::I64(_) => 8,
        }
    }
}

/// Everything after the size prefix: header flags, then fields in wire order
#[derive(Debug, Clone, Copy)]
pub struct FrameSpec<'a> {
    pub header: u8,
    pub fields: &'a [Field],
}

impl<'a> FrameSpec<'a> {
    /// Data frame; `fields` starts with route and sequence
    pub fn data(fields: &'a [Field]) -> Self {
        Self { header: DATA_BIT, fields }
    }

    /// Heartbeat frame, no fields
    pub fn heartbeat() -> FrameSpec<'static> {
        FrameSpec { header: HEARTBEAT_BIT, fields: &[] }
    }

    /// Value of the size prefix
    pub fn size(&self) -> usize {
        HEADER_BYTES + self.fields.iter().map(Field::width).sum::<usize>()
    }

    /// Length on the wire, size prefix included
    pub fn frame_len(&self) -> usize {
        SIZE_BYTES + self.size()
    }
}

/// Value of the size prefix for `size` bytes following it
pub fn size_field(size: usize) -> io::Result<u32> {
    u32::try_from(size).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame size {} overflows the u32 size prefix", size),
        )
    })
}

/// Encodes a frame into a buffer drawn from `pool`
///
/// On error nothing escapes: the buffer has already gone back to its pool.
pub trait FrameWriter: Send + Sync {
    fn encode(&self, pool: &BufferPool, frame: &FrameSpec<'_>) -> Result<PooledBuffer>;
}

// =============================================================================
// Sequential Strategy
// =============================================================================

/// Stream-style writer over any `io::Write`
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialWriter;

impl SequentialWriter {
    /// Write one frame, field by field, into `sink`
    pub fn write_to<S: Write + ?Sized>(sink: &mut S, frame: &FrameSpec<'_>) -> io::Result<()> {
        let size = size_field(frame.size())?;

        sink.write_all(&size.to_be_bytes())?;
        sink.write_all(&[frame.header])?;

        for field in frame.fields {
            match *field {
                Field::U8(v) => sink.write_all(&[v])?,
                Field::I8(v) => sink.write_all(&v.to_be_bytes())?,
                Field::U16(v) => sink.write_all(&v.to_be_bytes())?,
                Field::I16(v) => sink.write_all(&v.to_be_bytes())?,
                Field::U32(v) => sink.write_all(&v.to_be_bytes())?,
                Field::I32(v) => sink.write_all(&v.to_be_bytes())?,
                Field::U64(v) => sink.write_all(&v.to_be_bytes())?,
                Field::I64(v) => sink.write_all(&v.to_be_bytes())?,
            }
        }

        Ok(())
    }
}

impl FrameWriter for SequentialWriter {
    fn encode(&self, pool: &BufferPool, frame: &FrameSpec<'_>) -> Result<PooledBuffer> {
        let mut buf = pool.acquire();

        if let Err(e) = Self::write_to(&mut buf, frame) {
            buf.release();
            return Err(WireError::Encoding(e.to_string()));
        }

        if !buf.is_full() {
            let written = buf.len();
            buf.release();
            return Err(WireError::Encoding(format!(
                "frame is {} bytes, buffer expects {}",
                written,
                pool.frame_len()
            )));
        }

        Ok(buf)
    }
}

// =============================================================================
// Typed Strategy
// =============================================================================

/// Typed put methods over a reserved region of a pooled buffer
///
/// The reservation is checked against the buffer when the sink is created,
/// so the puts themselves return nothing.
///
/// # Panics
///
/// A put that does not fit in what is left of the reservation panics instead
/// of growing the buffer.
pub struct TypedSink<'a> {
    buf: &'a mut BytesMut,
    reserved: usize,
}

impl<'a> TypedSink<'a> {
    /// Reserve `len` bytes of `buf` for typed puts
    pub fn new(buf: &'a mut PooledBuffer, len: usize) -> Result<Self> {
        if len > buf.remaining() {
            return Err(WireError::Encoding(format!(
                "cannot reserve {} bytes, buffer has {} left",
                len,
                buf.remaining()
            )));
        }

        Ok(Self {
            buf: buf.storage_mut(),
            reserved: len,
        })
    }

    /// Bytes left in the reservation
    pub fn remaining(&self) -> usize {
        self.reserved
    }

    fn claim(&mut self, width: usize) {
        assert!(
            width <= self.reserved,
            "typed sink overrun: {} byte put with {} bytes reserved",
            width,
            self.reserved
        );
        self.reserved -= width;
    }

    pub fn write_u8(&mut self, v: u8) {
        self.claim(1);
        self.buf.put_u8(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.claim(1);
        self.buf.put_i8(v);
    }

    pub fn write_u16_be(&mut self, v: u16) {
        self.claim(2);
        self.buf.put_u16(v);
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.claim(2);
        self.buf.put_u16_le(v);
    }

    pub fn write_i16_be(&mut self, v: i16) {
        self.claim(2);
        self.buf.put_i16(v);
    }

    pub fn write_i16_le(&mut self, v: i16) {
        self.claim(2);
        self.buf.put_i16_le(v);
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.claim(4);
        self.buf.put_u32(v);
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.claim(4);
        self.buf.put_u32_le(v);
    }

    pub fn write_i32_be(&mut self, v: i32) {
        self.claim(4);
        self.buf.put_i32(v);
    }

    pub fn write_i32_le(&mut self, v: i32) {
        self.claim(4);
        self.buf.put_i32_le(v);
    }

    pub fn write_u64_be(&mut self, v: u64) {
        self.claim(8);
        self.buf.put_u64(v);
    }

    pub fn write_u64_le(&mut self, v: u64) {
        self.claim(8);
        self.buf.put_u64_le(v);
    }

    pub fn write_i64_be(&mut self, v: i64) {
        self.claim(8);
        self.buf.put_i64(v);
    }

    pub fn write_i64_le(&mut self, v: i64) {
        self.claim(8);
        self.buf.put_i64_le(v);
    }
}

/// Layout-checked writer built on [`TypedSink`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedWriter;

impl FrameWriter for TypedWriter {
    fn encode(&self, pool: &BufferPool, frame: &FrameSpec<'_>) -> Result<PooledBuffer> {
        let size = size_field(frame.size()).map_err(|e| WireError::Encoding(e.to_string()))?;

        if frame.frame_len() != pool.frame_len() {
            return Err(WireError::Encoding(format!(
                "frame is {} bytes, buffer expects {}",
                frame.frame_len(),
                pool.frame_len()
            )));
        }

        let mut buf = pool.acquire();
        {
            let mut sink = TypedSink::new(&mut buf, frame.frame_len())?;
            sink.write_u32_be(size);
            sink.write_u8(frame.header);

            for field in frame.fields {
                match *field {
                    Field::U8(v) => sink.write_u8(v),
                    Field::I8(v) => sink.write_i8(v),
                    Field::U16(v) => sink.write_u16_be(v),
                    Field::I16(v) => sink.write_i16_be(v),
                    Field::U32(v) => sink.write_u32_be(v),
                    Field::I32(v) => sink.write_i32_be(v),
                    Field::U64(v) => sink.write_u64_be(v),
                    Field::I64(v) => sink.write_i64_be(v),
                }
            }
        }

        Ok(buf)
    }
}

// =============================================================================
// Runtime Selection
// =============================================================================

impl FrameWriter for WriterStrategy {
    fn encode(&self, pool: &BufferPool, frame: &FrameSpec<'_>) -> Result<PooledBuffer> {
        match self {
            WriterStrategy::Sequential => SequentialWriter.encode(pool, frame),
            WriterStrategy::Typed => TypedWriter.encode(pool, frame),
        }
    }
}
