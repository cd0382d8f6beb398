//! Unbind packer
//!
//! ## Request
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬──────────────┐
//! │ Size (4) │Header (1)│ Route (1)│ Sequence (8) │  User ID (8) │
//! └──────────┴──────────┴──────────┴──────────────┴──────────────┘
//! ```
//!
//! ## Response
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬──────────┐
//! │ Size (4) │Header (1)│ Route (1)│ Sequence (8) │ Code (2) │
//! └──────────┴──────────┴──────────┴──────────────┴──────────┘
//! ```

use super::layout::{expect_len, read_i16, read_i64, read_u64, Anchor};
use super::Packer;
use crate::config::WriterStrategy;
use crate::error::Result;
use crate::pool::{self, BufferPool, PoolRegistry, PooledBuffer};
use crate::protocol::route::{UNBIND_REQ, UNBIND_RES};
use crate::protocol::{Field, FrameSpec, FrameWriter, CODE_BYTES, DATA_PREFIX_BYTES, SEQ_OFFSET};

/// Width of the user id
const USER_ID_BYTES: usize = 8;

/// Total request frame length
pub const REQUEST_BYTES: usize = DATA_PREFIX_BYTES + USER_ID_BYTES;

/// Total response frame length
pub const RESPONSE_BYTES: usize = DATA_PREFIX_BYTES + CODE_BYTES;

const SEQ_AT: Anchor = Anchor::Start(SEQ_OFFSET);
const USER_ID_AT: Anchor = Anchor::Start(DATA_PREFIX_BYTES);
const CODE_AT: Anchor = Anchor::End(CODE_BYTES);

/// Ask the peer to unbind a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbindRequest {
    pub seq: u64,
    pub uid: i64,
}

/// Outcome of an unbind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbindResponse {
    pub seq: u64,
    pub code: i16,
}

/// Packs and unpacks Unbind frames
pub struct UnbindPacker<W: FrameWriter = WriterStrategy> {
    req_pool: BufferPool,
    res_pool: BufferPool,
    writer: W,
}

impl UnbindPacker {
    /// Packer on the process-wide pools using the sequential writer
    pub fn new() -> Self {
        Self::with_writer(WriterStrategy::Sequential)
    }
}

impl Default for UnbindPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: FrameWriter> UnbindPacker<W> {
    /// Packer on the process-wide pools using `writer`
    pub fn with_writer(writer: W) -> Self {
        Self {
            req_pool: pool::shared(REQUEST_BYTES),
            res_pool: pool::shared(RESPONSE_BYTES),
            writer,
        }
    }

    /// Packer on an explicit registry
    pub fn with_registry(registry: &PoolRegistry, writer: W) -> Result<Self> {
        Ok(Self {
            req_pool: registry.pool(REQUEST_BYTES)?,
            res_pool: registry.pool(RESPONSE_BYTES)?,
            writer,
        })
    }

    pub fn request_pool(&self) -> &BufferPool {
        &self.req_pool
    }

    pub fn response_pool(&self) -> &BufferPool {
        &self.res_pool
    }
}

impl<W: FrameWriter> Packer for UnbindPacker<W> {
    type Request = UnbindRequest;
    type Response = UnbindResponse;

    fn request_route(&self) -> i8 {
        UNBIND_REQ
    }

    fn response_route(&self) -> i8 {
        UNBIND_RES
    }

    fn pack_request(&self, req: &UnbindRequest) -> Result<PooledBuffer> {
        let fields = [Field::I8(UNBIND_REQ), Field::U64(req.seq), Field::I64(req.uid)];
        self.writer.encode(&self.req_pool, &FrameSpec::data(&fields))
    }

    fn unpack_request(&self, data: &[u8]) -> Result<UnbindRequest> {
        expect_len(data, REQUEST_BYTES, "unbind request")?;

        Ok(UnbindRequest {
            seq: read_u64(data, SEQ_AT)?,
            uid: read_i64(data, USER_ID_AT)?,
        })
    }

    fn pack_response(&self, res: &UnbindResponse) -> Result<PooledBuffer> {
        let fields = [Field::I8(UNBIND_RES), Field::U64(res.seq), Field::I16(res.code)];
        self.writer.encode(&self.res_pool, &FrameSpec::data(&fields))
    }

    fn unpack_response(&self, data: &[u8]) -> Result<UnbindResponse> {
        expect_len(data, RESPONSE_BYTES, "unbind response")?;

        Ok(UnbindResponse {
            seq: read_u64(data, SEQ_AT)?,
            code: read_i16(data, CODE_AT)?,
        })
    }
}
