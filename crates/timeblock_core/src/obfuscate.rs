//! XOR obfuscation codec for exported calendar payloads.
//!
//! # Responsibility
//! - Encode backup payloads so they are not stored as plain text.
//! - Decode payloads produced by `encode` with the same key.
//!
//! # Invariants
//! - This is obfuscation, not encryption; it is not a security boundary.
//! - The mask is the XOR-fold of the key bytes, so `decode(encode(x)) == x`
//!   for any key.
//! - Output is lowercase hex, two digits per payload byte.

use std::error::Error;
use std::fmt::{Display, Formatter, Write};

/// Decode/encode failure for obfuscated payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObfuscateError {
    /// Keys must contain at least one byte.
    EmptyKey,
    /// Hex payloads must have an even number of digits.
    OddLength(usize),
    /// Payload contains a non-hex character.
    InvalidHex { position: usize },
    /// Decoded bytes are not valid UTF-8 under the provided key.
    InvalidPlaintext,
}

impl Display for ObfuscateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "obfuscation key cannot be empty"),
            Self::OddLength(len) => {
                write!(f, "obfuscated payload has odd length {len}")
            }
            Self::InvalidHex { position } => {
                write!(f, "obfuscated payload has non-hex digit at byte {position}")
            }
            Self::InvalidPlaintext => {
                write!(f, "decoded payload is not valid UTF-8; wrong key?")
            }
        }
    }
}

impl Error for ObfuscateError {}

/// Encodes `text` by XOR-masking each byte and hex-encoding the result.
///
/// # Errors
/// - `EmptyKey` when `key` has no bytes.
pub fn encode(text: &str, key: &str) -> Result<String, ObfuscateError> {
    let mask = key_mask(key)?;
    let mut out = String::with_capacity(text.len() * 2);
    for byte in text.bytes() {
        // Infallible write into a String.
        let _ = write!(out, "{:02x}", byte ^ mask);
    }
    Ok(out)
}

/// Decodes a payload produced by [`encode`] with the same `key`.
///
/// # Errors
/// - `EmptyKey`, `OddLength`, `InvalidHex` for malformed input.
/// - `InvalidPlaintext` when the unmasked bytes are not UTF-8 (typically a
///   key mismatch).
pub fn decode(encoded: &str, key: &str) -> Result<String, ObfuscateError> {
    let mask = key_mask(key)?;

    if encoded.len() % 2 != 0 {
        return Err(ObfuscateError::OddLength(encoded.len()));
    }

    let digits = encoded.as_bytes();
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for (index, pair) in digits.chunks_exact(2).enumerate() {
        let hi = hex_value(pair[0]).ok_or(ObfuscateError::InvalidHex { position: index * 2 })?;
        let lo = hex_value(pair[1]).ok_or(ObfuscateError::InvalidHex {
            position: index * 2 + 1,
        })?;
        bytes.push(((hi << 4) | lo) ^ mask);
    }

    String::from_utf8(bytes).map_err(|_| ObfuscateError::InvalidPlaintext)
}

fn key_mask(key: &str) -> Result<u8, ObfuscateError> {
    if key.is_empty() {
        return Err(ObfuscateError::EmptyKey);
    }
    Ok(key.bytes().fold(0, |acc, byte| acc ^ byte))
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
