//! The poll-based server event loop.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mio::event::Event;
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token, Waker};
use tracing::{debug, info, warn};

use hyponome_hash::{HashError, hash};

use crate::config::ServerConfig;
use crate::connection::Connection;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;

const LISTENER: Token = Token(0);
const WAKER: Token = Token(1);
const FIRST_CONNECTION_TOKEN: usize = 2;

/// How long a single poll may block before the loop checks the shutdown
/// flag and sweeps idle connections.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The `Hasher` TCP server.
pub struct Server {
    config: ServerConfig,
    poll: Poll,
    listener: TcpListener,
    connections: HashMap<Token, Connection>,
    handler: RequestHandler,
    next_token: usize,
    shutdown: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

/// Handle for stopping a running server from another thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ShutdownHandle {
    /// Signals the server loop to stop after the current poll cycle.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        if let Err(e) = self.waker.wake() {
            warn!(error = %e, "failed to wake server for shutdown");
        }
    }
}

impl Server {
    /// Creates a new server bound to the configured address.
    ///
    /// Runs the hash engine's one-time self-test first; a failed
    /// cryptographic subsystem aborts startup before the listener binds.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        hash::init().map_err(HashError::from)?;

        let poll = Poll::new()?;
        let waker = Arc::new(Waker::new(poll.registry(), WAKER)?);

        let mut listener =
            TcpListener::bind(config.bind_addr).map_err(|source| ServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;

        Ok(Self {
            config,
            poll,
            listener,
            connections: HashMap::new(),
            handler: RequestHandler::new(),
            next_token: FIRST_CONNECTION_TOKEN,
            shutdown: Arc::new(AtomicBool::new(false)),
            waker,
        })
    }

    /// Returns the address the listener is bound to.
    ///
    /// Useful when binding to port 0 and letting the OS pick.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Returns a handle that can stop this server from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            waker: Arc::clone(&self.waker),
        }
    }

    /// Runs the event loop until a shutdown is signalled.
    pub fn run(&mut self) -> ServerResult<()> {
        info!(addr = %self.local_addr()?, "hasher service listening");

        let mut events = Events::with_capacity(1024);
        loop {
            if let Err(e) = self.poll.poll(&mut events, Some(POLL_INTERVAL)) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(e.into());
            }

            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown signalled, stopping server");
                return Ok(());
            }

            for event in &events {
                match event.token() {
                    LISTENER => self.accept_connections()?,
                    WAKER => {} // Only relevant for the shutdown check above
                    token => self.handle_connection_event(token, event),
                }
            }

            self.sweep_idle_connections();
        }
    }

    /// Accepts pending connections until the listener would block.
    fn accept_connections(&mut self) -> ServerResult<()> {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    if self.connections.len() >= self.config.max_connections {
                        warn!(
                            %peer,
                            max = self.config.max_connections,
                            "rejecting connection: at capacity"
                        );
                        drop(stream);
                        continue;
                    }

                    let token = Token(self.next_token);
                    self.next_token += 1;

                    self.poll
                        .registry()
                        .register(&mut stream, token, Interest::READABLE)?;
                    debug!(%peer, token = token.0, "accepted connection");
                    self.connections.insert(
                        token,
                        Connection::new(token, stream, self.config.buffer_size),
                    );
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Processes a readiness event for an established connection.
    ///
    /// Each connection is handled independently: a protocol error closes
    /// that connection only, never the server.
    fn handle_connection_event(&mut self, token: Token, event: &Event) {
        let Some(conn) = self.connections.get_mut(&token) else {
            return;
        };

        let mut close = false;

        if event.is_readable() {
            match conn.read() {
                Ok(true) => conn.touch(),
                // Half-close: a one-shot client may send its request
                // and shut down its write side in the same event. The
                // buffered requests still get decoded and answered
                // before the connection drops.
                Ok(false) => conn.eof = true,
                Err(e) => {
                    warn!(token = token.0, error = %e, "read failed");
                    close = true;
                }
            }

            while !close && conn.has_pending_data() {
                match conn.try_decode_request() {
                    Ok(Some(request)) => {
                        let response = self.handler.handle(request);
                        if let Err(e) = conn.queue_response(&response) {
                            warn!(token = token.0, error = %e, "failed to queue response");
                            close = true;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(token = token.0, error = %e, "protocol error, closing connection");
                        close = true;
                    }
                }
            }
        }

        if !close && (event.is_writable() || !conn.write_buf.is_empty()) {
            match conn.write() {
                Ok(_) => conn.touch(),
                Err(e) => {
                    warn!(token = token.0, error = %e, "write failed");
                    close = true;
                }
            }
        }

        // A half-closed connection lingers until its responses are out.
        if conn.eof && conn.write_buf.is_empty() {
            close = true;
        }

        if close {
            if let Some(mut conn) = self.connections.remove(&token) {
                let _ = self.poll.registry().deregister(&mut conn.stream);
            }
            debug!(token = token.0, "connection closed");
            return;
        }

        let interest = conn.interest();
        if let Err(e) = self
            .poll
            .registry()
            .reregister(&mut conn.stream, token, interest)
        {
            warn!(token = token.0, error = %e, "reregister failed, closing connection");
            if let Some(mut conn) = self.connections.remove(&token) {
                let _ = self.poll.registry().deregister(&mut conn.stream);
            }
        }
    }

    /// Drops connections that have been silent past the idle timeout.
    fn sweep_idle_connections(&mut self) {
        let timeout = self.config.idle_timeout;
        let idle: Vec<Token> = self
            .connections
            .iter()
            .filter(|(_, conn)| conn.is_idle(timeout))
            .map(|(token, _)| *token)
            .collect();

        for token in idle {
            if let Some(mut conn) = self.connections.remove(&token) {
                let _ = self.poll.registry().deregister(&mut conn.stream);
                debug!(token = token.0, "dropped idle connection");
            }
        }
    }
}
