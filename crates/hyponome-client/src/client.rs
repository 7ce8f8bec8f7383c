//! The synchronous RPC client.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use hyponome_hash::hex;
use hyponome_wire::{
    Frame, HashRequest, Request, RequestId, RequestPayload, Response, ResponsePayload, parse_addr,
};

use crate::error::{ClientError, ClientResult};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Read timeout for responses. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write timeout for requests. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
    /// Initial read buffer capacity.
    pub buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(30)),
            write_timeout: Some(Duration::from_secs(30)),
            buffer_size: 64 * 1024,
        }
    }
}

/// A connected `Hasher` client.
///
/// Each [`hash`](Client::hash) call performs one request/response
/// exchange and blocks until the response arrives. The connection is
/// kept open between calls; there is no request pipelining.
pub struct Client {
    stream: TcpStream,
    read_buf: BytesMut,
    next_request_id: u64,
}

impl Client {
    /// Connects to a server at `host[:port]`.
    ///
    /// The protocol's default port (5923) applies when the endpoint
    /// carries none.
    pub fn connect(addr: &str, config: ClientConfig) -> ClientResult<Self> {
        let sock_addr = parse_addr(addr)?;
        let stream = TcpStream::connect(sock_addr)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        Ok(Self {
            stream,
            read_buf: BytesMut::with_capacity(config.buffer_size),
            next_request_id: 0,
        })
    }

    /// Hashes `payload` on the server and returns the raw digest bytes.
    pub fn hash(&mut self, payload: &[u8]) -> ClientResult<Vec<u8>> {
        let id = self.next_request_id;
        self.next_request_id += 1;

        let request = Request::new(
            RequestId::new(id),
            RequestPayload::Hash(HashRequest {
                data: Bytes::copy_from_slice(payload),
            }),
        );
        let frame = request.to_frame()?;
        self.stream.write_all(&frame.encode_to_bytes())?;

        let response = self.read_response()?;
        if response.id.0 != id {
            return Err(ClientError::ResponseIdMismatch {
                sent: id,
                received: response.id.0,
            });
        }

        match response.payload {
            ResponsePayload::Hash(h) => Ok(h.hash.to_vec()),
            ResponsePayload::Error(e) => Err(ClientError::Server {
                code: e.code,
                message: e.message,
            }),
        }
    }

    /// Hashes `payload` and returns the digest as a lowercase hex string.
    pub fn hash_hex(&mut self, payload: &[u8]) -> ClientResult<String> {
        Ok(hex::bin2hex(&self.hash(payload)?))
    }

    /// Blocks until a complete response frame has been read and decoded.
    fn read_response(&mut self) -> ClientResult<Response> {
        let mut temp_buf = [0u8; 4096];

        loop {
            if let Some(frame) = Frame::decode(&mut self.read_buf)? {
                return Ok(Response::from_frame(&frame)?);
            }

            let n = self.stream.read(&mut temp_buf)?;
            if n == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            self.read_buf.extend_from_slice(&temp_buf[..n]);
        }
    }
}
