//! Connection state management.

use std::io::{self, Read, Write};
use std::time::Instant;

use bytes::BytesMut;
use mio::net::TcpStream;
use mio::{Interest, Token};

use hyponome_wire::{FRAME_HEADER_SIZE, Frame, Request, Response};

use crate::error::ServerResult;

/// Per-connection state: socket, buffered I/O, and liveness tracking.
pub struct Connection {
    /// Poll registration token; handy when tracing a single peer.
    #[allow(dead_code)]
    pub token: Token,
    /// Non-blocking TCP stream.
    pub stream: TcpStream,
    /// Bytes received but not yet decoded.
    pub read_buf: BytesMut,
    /// Encoded responses awaiting a writable socket.
    pub write_buf: BytesMut,
    /// Last activity timestamp for idle timeout tracking.
    pub last_activity: Instant,
    /// The peer has closed its write side. Requests already buffered
    /// still get answered; the connection drops once the write buffer
    /// drains.
    pub eof: bool,
}

impl Connection {
    /// Creates a new connection.
    pub fn new(token: Token, stream: TcpStream, buffer_size: usize) -> Self {
        Self {
            token,
            stream,
            read_buf: BytesMut::with_capacity(buffer_size),
            write_buf: BytesMut::with_capacity(buffer_size),
            last_activity: Instant::now(),
            eof: false,
        }
    }

    /// Updates the last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Checks if the connection has been idle for longer than the timeout.
    pub fn is_idle(&self, timeout: std::time::Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    /// Reads everything the socket has into the read buffer.
    ///
    /// Returns `false` once the peer has stopped sending (orderly EOF).
    pub fn read(&mut self) -> io::Result<bool> {
        // 4 KiB chunks; the buffer grows only by what actually arrived.
        let mut temp_buf = [0u8; 4096];

        loop {
            match self.stream.read(&mut temp_buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.read_buf.extend_from_slice(&temp_buf[..n]);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    // Socket drained for this readiness event
                    return Ok(true);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Flushes as much of the write buffer as the socket accepts.
    ///
    /// Returns `true` once the buffer is empty.
    pub fn write(&mut self) -> io::Result<bool> {
        while !self.write_buf.is_empty() {
            match self.stream.write(&self.write_buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write to socket",
                    ));
                }
                Ok(n) => {
                    let _ = self.write_buf.split_to(n);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    // Kernel buffer full; retry on the next writable event
                    return Ok(false);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    /// Decodes the next complete request out of the read buffer, if any.
    pub fn try_decode_request(&mut self) -> ServerResult<Option<Request>> {
        match Frame::decode(&mut self.read_buf)? {
            Some(frame) => Ok(Some(Request::from_frame(&frame)?)),
            None => Ok(None),
        }
    }

    /// Encodes a response onto the write buffer.
    pub fn queue_response(&mut self, response: &Response) -> ServerResult<()> {
        let frame = response.to_frame()?;
        frame.encode(&mut self.write_buf);
        Ok(())
    }

    /// Readiness interests to register for the connection's current state.
    pub fn interest(&self) -> Interest {
        if self.write_buf.is_empty() {
            Interest::READABLE
        } else {
            Interest::READABLE | Interest::WRITABLE
        }
    }

    /// Whether the read buffer could hold at least one complete frame.
    pub fn has_pending_data(&self) -> bool {
        self.read_buf.len() >= FRAME_HEADER_SIZE
    }
}
