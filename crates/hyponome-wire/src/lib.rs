//! # hyponome-wire: binary wire protocol for hyponome
//!
//! Defines the framing and message types for the `Hasher` capability:
//! length-prefixed [`Frame`]s carrying postcard-serialized [`Request`]
//! and [`Response`] messages.
//!
//! Payloads and digests travel as raw bytes on the wire; hex encoding is
//! strictly a client-side presentation concern.
//!
//! ## Protocol surface
//!
//! The deployed protocol exposes a single operation, `hash`, which
//! computes a SHA-256 digest of the request payload. The engine behind
//! the server also supports unkeyed and keyed BLAKE2b, but those are
//! deliberately not reachable over the wire; [`RequestPayload`] is an
//! enum so that a future revision can add operations without reframing.

mod addr;
mod error;
mod frame;
mod message;

pub use addr::{DEFAULT_PORT, parse_addr};
pub use error::WireError;
pub use frame::{FRAME_HEADER_SIZE, Frame, MAX_FRAME_SIZE, PROTOCOL_VERSION};
pub use message::{
    ErrorCode, ErrorResponse, HashRequest, HashResponse, Request, RequestId, RequestPayload,
    Response, ResponsePayload,
};
