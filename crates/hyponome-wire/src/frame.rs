//! Length-prefixed framing.
//!
//! Every message travels in a frame with a fixed 8-byte header:
//!
//! ```text
//! ┌───────┬─────────┬───────┬────────────────┐
//! │ magic │ version │ flags │ payload length │
//! │  2 B  │   1 B   │  1 B  │   4 B (BE)     │
//! └───────┴─────────┴───────┴────────────────┘
//! ```
//!
//! Decoding is incremental: [`Frame::decode`] returns `Ok(None)` until a
//! complete frame is buffered, consuming nothing, so callers can keep
//! appending bytes from a non-blocking socket.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::WireError;

/// Frame magic bytes.
const MAGIC: [u8; 2] = *b"hy";

/// Wire protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum frame payload size (64 MiB).
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// A single wire frame: header plus opaque payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    /// Creates a frame wrapping the given payload.
    ///
    /// Payloads above [`MAX_FRAME_SIZE`] are a protocol violation; the
    /// peer's decoder rejects them.
    pub fn new(payload: Bytes) -> Self {
        debug_assert!(payload.len() <= MAX_FRAME_SIZE);
        Self { payload }
    }

    /// Returns the frame payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Encodes the frame into the given buffer.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(FRAME_HEADER_SIZE + self.payload.len());
        buf.put_slice(&MAGIC);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(0); // flags, reserved
        #[allow(clippy::cast_possible_truncation)]
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(&self.payload);
    }

    /// Encodes the frame into a freshly allocated buffer.
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Attempts to decode a frame from the front of the buffer.
    ///
    /// Returns `Ok(None)` if the buffer does not yet hold a complete
    /// frame; in that case nothing is consumed. On success the frame's
    /// bytes are removed from the buffer.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Frame>, WireError> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        if buf[0..2] != MAGIC {
            return Err(WireError::BadMagic);
        }
        if buf[2] != PROTOCOL_VERSION {
            return Err(WireError::UnsupportedVersion(buf[2]));
        }

        let len = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(WireError::FrameTooLarge { len });
        }
        if buf.len() < FRAME_HEADER_SIZE + len {
            return Ok(None);
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(len).freeze();
        Ok(Some(Frame { payload }))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn round_trip() {
        let frame = Frame::new(Bytes::from_static(b"hello"));
        let mut buf = BytesMut::from(&frame.encode_to_bytes()[..]);
        let decoded = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_payload_round_trip() {
        let frame = Frame::new(Bytes::new());
        let mut buf = BytesMut::from(&frame.encode_to_bytes()[..]);
        assert_eq!(Frame::decode(&mut buf).unwrap().unwrap(), frame);
    }

    #[test]
    fn partial_header_consumes_nothing() {
        let mut buf = BytesMut::from(&b"hy\x01"[..]);
        assert!(Frame::decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn partial_payload_consumes_nothing() {
        let frame = Frame::new(Bytes::from_static(b"hello world"));
        let encoded = frame.encode_to_bytes();
        let mut buf = BytesMut::from(&encoded[..encoded.len() - 1]);
        let before = buf.len();
        assert!(Frame::decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), before);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = BytesMut::from(&b"XX\x01\x00\x00\x00\x00\x00"[..]);
        assert!(matches!(Frame::decode(&mut buf), Err(WireError::BadMagic)));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut buf = BytesMut::from(&b"hy\x7f\x00\x00\x00\x00\x00"[..]);
        assert!(matches!(
            Frame::decode(&mut buf),
            Err(WireError::UnsupportedVersion(0x7f))
        ));
    }

    #[test]
    fn rejects_oversized_length() {
        let mut buf = BytesMut::new();
        buf.put_slice(&MAGIC);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(0);
        buf.put_u32(u32::MAX);
        assert!(matches!(
            Frame::decode(&mut buf),
            Err(WireError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn decodes_back_to_back_frames() {
        let first = Frame::new(Bytes::from_static(b"one"));
        let second = Frame::new(Bytes::from_static(b"two"));
        let mut buf = BytesMut::new();
        first.encode(&mut buf);
        second.encode(&mut buf);

        assert_eq!(Frame::decode(&mut buf).unwrap().unwrap(), first);
        assert_eq!(Frame::decode(&mut buf).unwrap().unwrap(), second);
        assert!(Frame::decode(&mut buf).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let frame = Frame::new(Bytes::from(payload));
            let mut buf = BytesMut::from(&frame.encode_to_bytes()[..]);
            let decoded = Frame::decode(&mut buf).unwrap().unwrap();
            prop_assert_eq!(decoded, frame);
            prop_assert!(buf.is_empty());
        }
    }
}
