//! Wire protocol error types.

use thiserror::Error;

/// Errors that can occur while framing or (de)serializing messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame header does not start with the protocol magic.
    #[error("bad frame magic")]
    BadMagic,

    /// Frame header carries a protocol version we do not speak.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Frame payload length exceeds the protocol maximum.
    #[error("frame payload too large: {len} bytes")]
    FrameTooLarge { len: usize },

    /// Message serialization failed.
    #[error("failed to serialize message: {0}")]
    Serialize(postcard::Error),

    /// Message deserialization failed.
    #[error("failed to deserialize message: {0}")]
    Deserialize(postcard::Error),

    /// Endpoint string could not be parsed or resolved.
    #[error("invalid endpoint address: {0}")]
    BadAddress(String),
}
