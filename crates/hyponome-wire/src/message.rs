//! Request and response messages.
//!
//! Messages are serialized with postcard and carried inside a [`Frame`].
//! The payload enums leave room for future operations; the deployed
//! protocol defines exactly one, `hash` (SHA-256).

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::WireError;
use crate::frame::Frame;

/// Correlates a response with the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Request identifier, echoed back in the response.
    pub id: RequestId,
    /// The operation to perform.
    pub payload: RequestPayload,
}

/// Operations a client may request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPayload {
    /// Compute the SHA-256 digest of the payload bytes.
    Hash(HashRequest),
}

/// Payload of a `hash` request: the bytes to digest, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRequest {
    pub data: Bytes,
}

/// A response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Identifier of the request this responds to.
    pub id: RequestId,
    /// The result of the operation.
    pub payload: ResponsePayload,
}

/// Results the server may return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePayload {
    /// Successful digest computation.
    Hash(HashResponse),
    /// The request failed.
    Error(ErrorResponse),
}

/// Payload of a successful `hash` response: the raw digest bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash: Bytes,
}

/// Payload of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

/// Machine-readable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The request could not be decoded or is otherwise malformed.
    InvalidRequest,
    /// The hash engine reported a failure for this request.
    HashFailed,
    /// An unexpected server-side failure.
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidRequest => "invalid request",
            Self::HashFailed => "hash failed",
            Self::InternalError => "internal error",
        };
        f.write_str(name)
    }
}

impl Request {
    /// Creates a new request.
    pub fn new(id: RequestId, payload: RequestPayload) -> Self {
        Self { id, payload }
    }

    /// Serializes the request into a frame.
    pub fn to_frame(&self) -> Result<Frame, WireError> {
        let bytes = postcard::to_allocvec(self).map_err(WireError::Serialize)?;
        Ok(Frame::new(Bytes::from(bytes)))
    }

    /// Deserializes a request from a frame payload.
    pub fn from_frame(frame: &Frame) -> Result<Self, WireError> {
        postcard::from_bytes(frame.payload()).map_err(WireError::Deserialize)
    }
}

impl Response {
    /// Creates a new response.
    pub fn new(id: RequestId, payload: ResponsePayload) -> Self {
        Self { id, payload }
    }

    /// Creates an error response.
    pub fn error(id: RequestId, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            id,
            payload: ResponsePayload::Error(ErrorResponse {
                code,
                message: message.into(),
            }),
        }
    }

    /// Serializes the response into a frame.
    pub fn to_frame(&self) -> Result<Frame, WireError> {
        let bytes = postcard::to_allocvec(self).map_err(WireError::Serialize)?;
        Ok(Frame::new(Bytes::from(bytes)))
    }

    /// Deserializes a response from a frame payload.
    pub fn from_frame(frame: &Frame) -> Result<Self, WireError> {
        postcard::from_bytes(frame.payload()).map_err(WireError::Deserialize)
    }
}
