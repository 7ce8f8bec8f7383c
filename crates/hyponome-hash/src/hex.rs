//! Hex codec: binary ↔ lowercase hexadecimal strings.
//!
//! Encoding is total and always produces lowercase output of exactly
//! `2 * len` characters. Decoding accepts both digit cases but fails on
//! odd-length input or any character outside `[0-9a-fA-F]`.

use thiserror::Error;

/// Errors reported by [`hex2bin`].
///
/// These are caller-correctable validation failures; they only arise
/// from locally supplied strings and never cross the wire.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Input length is not a multiple of two.
    #[error("hex string has odd length")]
    OddLength,

    /// Input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex digit {ch:?} at index {index}")]
    InvalidDigit { ch: char, index: usize },
}

/// Encodes binary data as a lowercase hex string.
///
/// Total: every byte sequence encodes, producing exactly two characters
/// per byte.
pub fn bin2hex(binary: &[u8]) -> String {
    hex::encode(binary)
}

/// Decodes a hex string into binary.
///
/// Accepts upper- and lowercase digits; the canonical form produced by
/// [`bin2hex`] is lowercase.
pub fn hex2bin(s: &str) -> Result<Vec<u8>, CodecError> {
    hex::decode(s).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            CodecError::InvalidDigit { ch: c, index }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            CodecError::OddLength
        }
    })
}
