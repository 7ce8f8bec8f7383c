//! # hyponome-hash: digest primitives for hyponome
//!
//! This crate contains the pure computational core of hyponome:
//! - Hash engine ([`hash`]): SHA-256 plus unkeyed and keyed BLAKE2b,
//!   always at the primitive's maximum output length.
//! - Hex codec ([`hex`]): binary ↔ lowercase hexadecimal conversion.
//!
//! All hashing goes through a one-time, process-wide self-test of the
//! primitives ([`hash::init`]); see the module docs for the contract.
//!
//! ## Usage
//!
//! ```
//! use hyponome_hash::{hash, hex};
//!
//! let digest = hash::sha256(b"hello world")?;
//! assert_eq!(hex::bin2hex(&digest).len(), 64);
//! # Ok::<(), hyponome_hash::HashError>(())
//! ```

pub mod hash;
pub mod hex;

pub use hash::{BLAKE2B_BYTES, HashError, InitError, SHA256_BYTES};
pub use hex::CodecError;
