//! Network Module
//!
//! Blocking TCP plumbing around the frame codec.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, frames read sequentially
//! - Write half shared behind a mutex (responses + keep-alive)
//! - Request frames routed through a `Router`

mod connection;
mod keepalive;
mod server;

pub use connection::{FrameConn, SharedWriter, TcpFrameConn};
pub use keepalive::KeepAlive;
pub use server::{Server, ShutdownHandle};
