//! # hyponome-client: RPC client for the `Hasher` capability
//!
//! This crate provides a synchronous client for the hyponome service
//! using the binary wire protocol defined in `hyponome-wire`.
//!
//! One call to [`Client::hash`] performs exactly one request/response
//! exchange; the connection stays open for subsequent calls. The digest
//! comes back as raw bytes — [`Client::hash_hex`] renders it as the
//! canonical lowercase hex string.
//!
//! ## Usage
//!
//! ```ignore
//! use hyponome_client::{Client, ClientConfig};
//!
//! // "host[:port]" — the default port 5923 applies when omitted
//! let mut client = Client::connect("127.0.0.1", ClientConfig::default())?;
//!
//! let hex = client.hash_hex(b"This is a test file.\n")?;
//! println!("{hex}");
//! ```

mod client;
mod error;

pub use client::{Client, ClientConfig};
pub use error::{ClientError, ClientResult};
