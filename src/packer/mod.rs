//! Packer Module
//!
//! Per-operation encode/decode on top of the frame writers.
//!
//! Each operation owns the pools for its fixed frame lengths and exposes the
//! pack/unpack quadruple through [`Packer`]. A [`Router`] maps request route
//! codes to handlers built from packers.

mod layout;
mod router;
pub mod unbind;

pub use layout::{expect_len, read_i16, read_i64, read_u64, Anchor};
pub use router::{Handler, Router};
pub use unbind::{UnbindPacker, UnbindRequest, UnbindResponse};

use crate::error::Result;
use crate::pool::PooledBuffer;

/// Encode/decode quadruple for one operation
///
/// Packed buffers belong to the caller, who hands them to the transport;
/// the transport releases them after writing.
pub trait Packer: Send + Sync {
    type Request;
    type Response;

    /// Route code written into request frames
    fn request_route(&self) -> i8;

    /// Route code written into response frames
    fn response_route(&self) -> i8;

    fn pack_request(&self, req: &Self::Request) -> Result<PooledBuffer>;

    fn unpack_request(&self, data: &[u8]) -> Result<Self::Request>;

    fn pack_response(&self, res: &Self::Response) -> Result<PooledBuffer>;

    fn unpack_response(&self, data: &[u8]) -> Result<Self::Response>;
}
