//! # hyponome-server: the `Hasher` service daemon
//!
//! This crate provides the TCP server that exposes the hyponome hash
//! engine over the network using the binary wire protocol defined in
//! `hyponome-wire`.
//!
//! ## Architecture
//!
//! The server uses `mio` for non-blocking I/O with a poll-based event
//! loop: explicit control flow, no async runtime.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    hyponome-server                      │
//! │  ┌──────────┐   ┌─────────────┐   ┌─────────────────┐   │
//! │  │ Listener │ → │ Connections │ → │ RequestHandler  │   │
//! │  │  (TCP)   │   │ (mio poll)  │   │ (→ hash engine) │   │
//! │  └──────────┘   └─────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The handler is stateless: each request's payload is hashed with
//! SHA-256 and the raw digest returned. No state is shared between
//! requests, so connections are fully independent of one another.
//! The hash engine's one-time self-test runs in [`Server::new`], before
//! the listener binds — a failed cryptographic subsystem aborts startup.
//!
//! ## Usage
//!
//! ```ignore
//! use hyponome_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::new("127.0.0.1:5923".parse()?);
//! let mut server = Server::new(config)?;
//! server.run()?;
//! ```

mod config;
mod connection;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownHandle};
