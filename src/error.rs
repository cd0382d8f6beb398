//! Error types for framewire
//!
//! Provides a unified error type for all operations.

use std::io::ErrorKind;

use thiserror::Error;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for framewire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Frame Errors
    // -------------------------------------------------------------------------
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Dispatch Errors
    // -------------------------------------------------------------------------
    #[error("No packer registered for route {0}")]
    UnknownRoute(i8),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WireError {
    /// Frame was rejected during validation
    pub fn is_malformed(&self) -> bool {
        matches!(self, WireError::MalformedFrame(_))
    }

    /// Underlying stream failed (short read, closed, timed out)
    pub fn is_transport(&self) -> bool {
        matches!(self, WireError::Io(_))
    }

    /// Peer went away or the stream hit its deadline.
    ///
    /// The connection loop treats these as a normal end of session.
    pub fn is_disconnect(&self) -> bool {
        match self {
            WireError::Io(e) => matches!(
                e.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::WouldBlock
                    | ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
