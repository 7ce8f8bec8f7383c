//! Hash engine: SHA-256 and BLAKE2b digests.
//!
//! All functions are pure and deterministic. BLAKE2b is always used at
//! its maximum output length (64 bytes); the keyed variant accepts keys
//! of 0–64 bytes, where an empty key is equivalent to the unkeyed hash.
//!
//! ## Initialization
//!
//! The engine performs a one-time, process-wide self-test of both
//! primitives against known-answer vectors before the first digest is
//! computed. The guard is single-flight: any number of threads may race
//! to trigger it, the test runs exactly once, and its verdict is cached
//! for the lifetime of the process. A failed self-test poisons the
//! engine — every subsequent call reports [`HashError::Init`].

use std::sync::OnceLock;

use blake2::digest::Mac;
use blake2::{Blake2b512, Blake2bMac512};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::hex;

/// SHA-256 digest length in bytes.
pub const SHA256_BYTES: usize = 32;

/// BLAKE2b digest length in bytes (maximum output of the primitive).
pub const BLAKE2B_BYTES: usize = 64;

/// Maximum BLAKE2b key length in bytes.
pub const BLAKE2B_KEY_MAX: usize = 64;

/// Errors reported by the hash engine.
///
/// Under normal operation none of these arise from caller payloads;
/// `Init` signals a broken cryptographic subsystem and is effectively
/// fatal, `KeyTooLong` rejects keys the primitive cannot accept.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    /// The one-time self-test failed; no hashing can proceed.
    #[error("hash subsystem failed to initialize: {0}")]
    Init(#[from] InitError),

    /// BLAKE2b key exceeds the primitive's 64-byte maximum.
    #[error("BLAKE2b key too long: {len} bytes (maximum 64)")]
    KeyTooLong { len: usize },
}

/// Failure of the one-time known-answer self-test.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// SHA-256 produced a wrong digest for a known input.
    #[error("SHA-256 known-answer self-test failed")]
    Sha256SelfTest,

    /// BLAKE2b produced a wrong digest for a known input.
    #[error("BLAKE2b known-answer self-test failed")]
    Blake2bSelfTest,
}

/// SHA-256 of the empty input (FIPS 180-4 known answer).
const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// BLAKE2b-512 of the empty input (RFC 7693 known answer).
const BLAKE2B_EMPTY: &str = "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
                             d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce";

static INIT: OnceLock<Result<(), InitError>> = OnceLock::new();

/// Initializes the hash engine.
///
/// Runs the known-answer self-test exactly once per process regardless
/// of how many callers race here; subsequent calls return the cached
/// verdict. Every hashing entry point calls this, so explicit use is
/// only needed by code that wants to fail fast at startup (the server
/// does this before binding its listener).
pub fn init() -> Result<(), InitError> {
    *INIT.get_or_init(self_test)
}

fn self_test() -> Result<(), InitError> {
    if hex::bin2hex(&sha256_digest(b"")) != SHA256_EMPTY {
        return Err(InitError::Sha256SelfTest);
    }
    if hex::bin2hex(&blake2b_digest(b"")) != BLAKE2B_EMPTY {
        return Err(InitError::Blake2bSelfTest);
    }
    Ok(())
}

/// Computes the SHA-256 digest of `msg`.
///
/// Deterministic, defined for empty input, always 32 bytes.
pub fn sha256(msg: &[u8]) -> Result<[u8; SHA256_BYTES], HashError> {
    init()?;
    Ok(sha256_digest(msg))
}

/// Computes the unkeyed BLAKE2b digest of `msg` at maximum output length.
pub fn blake2b(msg: &[u8]) -> Result<[u8; BLAKE2B_BYTES], HashError> {
    init()?;
    Ok(blake2b_digest(msg))
}

/// Computes the keyed BLAKE2b digest of `msg` at maximum output length.
///
/// The key may be 0–64 bytes; an empty key yields the same digest as
/// [`blake2b`]. Longer keys are rejected with [`HashError::KeyTooLong`].
pub fn blake2b_keyed(msg: &[u8], key: &[u8]) -> Result<[u8; BLAKE2B_BYTES], HashError> {
    init()?;
    if key.is_empty() {
        // Matches the primitive's convention: zero-length key == unkeyed.
        return Ok(blake2b_digest(msg));
    }
    let mut mac = Blake2bMac512::new_from_slice(key)
        .map_err(|_| HashError::KeyTooLong { len: key.len() })?;
    mac.update(msg);
    let mut out = [0u8; BLAKE2B_BYTES];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn sha256_digest(msg: &[u8]) -> [u8; SHA256_BYTES] {
    let mut hasher = Sha256::new();
    hasher.update(msg);
    hasher.finalize().into()
}

fn blake2b_digest(msg: &[u8]) -> [u8; BLAKE2B_BYTES] {
    let mut hasher = Blake2b512::new();
    Digest::update(&mut hasher, msg);
    let mut out = [0u8; BLAKE2B_BYTES];
    out.copy_from_slice(&hasher.finalize());
    out
}
