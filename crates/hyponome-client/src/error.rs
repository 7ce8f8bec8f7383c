//! Client error types.

use hyponome_wire::{ErrorCode, WireError};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Wire protocol error.
    #[error("wire protocol error: {0}")]
    Wire(#[from] WireError),

    /// The server reported a failure for this request.
    #[error("server error ({code}): {message}")]
    Server { code: ErrorCode, message: String },

    /// The response id does not match the request we sent.
    #[error("response id mismatch: sent {sent}, received {received}")]
    ResponseIdMismatch { sent: u64, received: u64 },

    /// The connection closed before a full response arrived.
    #[error("connection closed mid-response")]
    ConnectionClosed,
}
