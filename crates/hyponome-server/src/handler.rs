//! Request handler that routes requests to the hash engine.

use bytes::Bytes;
use tracing::instrument;

use hyponome_hash::{HashError, hash};
use hyponome_wire::{
    ErrorCode, HashResponse, Request, RequestPayload, Response, ResponsePayload,
};

use crate::error::{ServerError, ServerResult};

/// Handles requests by routing them to the hash engine.
///
/// Stateless: no data survives a call, so one handler instance serves
/// every connection without locking.
pub struct RequestHandler;

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new() -> Self {
        Self
    }

    /// Handles a request and returns a response.
    #[instrument(skip_all, fields(request_id))]
    pub fn handle(&self, request: Request) -> Response {
        let request_id = request.id;
        tracing::Span::current().record("request_id", request_id.0);

        match self.handle_inner(request) {
            Ok(payload) => Response::new(request_id, payload),
            Err(e) => {
                let (code, message) = error_to_wire(&e);
                Response::error(request_id, code, message)
            }
        }
    }

    fn handle_inner(&self, request: Request) -> ServerResult<ResponsePayload> {
        match request.payload {
            RequestPayload::Hash(req) => {
                // Payload taken verbatim; digest returned as raw bytes.
                let digest = hash::sha256(&req.data)?;
                tracing::debug!(payload_len = req.data.len(), "hashed payload");
                Ok(ResponsePayload::Hash(HashResponse {
                    hash: Bytes::copy_from_slice(&digest),
                }))
            }
        }
    }
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a server error to a wire error code and message.
fn error_to_wire(error: &ServerError) -> (ErrorCode, String) {
    match error {
        ServerError::Wire(e) => (ErrorCode::InvalidRequest, e.to_string()),
        ServerError::Hash(e) => match e {
            HashError::Init(_) => (ErrorCode::InternalError, e.to_string()),
            HashError::KeyTooLong { .. } => (ErrorCode::HashFailed, e.to_string()),
        },
        ServerError::Io(e) | ServerError::BindFailed { source: e, .. } => {
            (ErrorCode::InternalError, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use hyponome_wire::{HashRequest, RequestId};

    use super::*;

    fn hash_request(id: u64, data: &'static [u8]) -> Request {
        Request::new(
            RequestId::new(id),
            RequestPayload::Hash(HashRequest {
                data: Bytes::from_static(data),
            }),
        )
    }

    #[test]
    fn digest_matches_local_computation() {
        let handler = RequestHandler::new();
        let response = handler.handle(hash_request(1, b"This is a test file.\n"));

        assert_eq!(response.id, RequestId::new(1));
        match response.payload {
            ResponsePayload::Hash(h) => {
                let local = hash::sha256(b"This is a test file.\n").unwrap();
                assert_eq!(&h.hash[..], &local[..]);
                assert_eq!(
                    hyponome_hash::hex::bin2hex(&h.hash),
                    "649b8b471e7d7bc175eec758a7006ac693c434c8297c07db15286788c837154a"
                );
            }
            ResponsePayload::Error(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn empty_payload_is_hashed() {
        let handler = RequestHandler::new();
        let response = handler.handle(hash_request(2, b""));

        match response.payload {
            ResponsePayload::Hash(h) => {
                assert_eq!(h.hash.len(), hyponome_hash::SHA256_BYTES);
            }
            ResponsePayload::Error(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn response_echoes_request_id() {
        let handler = RequestHandler::new();
        assert_eq!(
            handler.handle(hash_request(42, b"x")).id,
            RequestId::new(42)
        );
    }

    #[test]
    fn error_mapping_covers_wire_errors() {
        let err = ServerError::Wire(hyponome_wire::WireError::BadMagic);
        let (code, _) = error_to_wire(&err);
        assert_eq!(code, ErrorCode::InvalidRequest);
    }
}
