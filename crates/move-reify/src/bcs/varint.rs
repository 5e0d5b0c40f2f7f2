// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ULEB128 (Unsigned Little-Endian Base 128) for vector lengths and enum
//! variant indices.
//!
//! # Encoding Rules
//!
//! - Each byte uses 7 bits for data, bit 7 indicates continuation
//! - Values 0-127 encode in 1 byte
//! - BCS values are bounded by `u32`, so at most 5 bytes are read
//! - Only the shortest encoding is accepted (no trailing zero groups)
//!
//! ```
//! use move_reify::bcs::{decode_uleb128, encode_uleb128};
//!
//! let mut buf = Vec::new();
//! encode_uleb128(300, &mut buf);
//! assert_eq!(buf, [0xAC, 0x02]);
//! assert_eq!(decode_uleb128(&buf).unwrap(), (300, 2));
//! ```

use thiserror::Error;

/// Maximum bytes of a `u32` ULEB128.
pub const MAX_ULEB128_LEN: usize = 5;

/// Continuation bit mask (bit 7).
const CONTINUATION_BIT: u8 = 0x80;

/// Data bits mask (bits 0-6).
const DATA_MASK: u8 = 0x7F;

/// Error returned when ULEB128 decoding fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarintError {
    #[error("unexpected end of buffer while reading ULEB128")]
    UnexpectedEof,
    #[error("ULEB128 value does not fit in u32")]
    Overflow,
    #[error("non-canonical ULEB128 encoding")]
    NonCanonical,
}

/// Append `value` as ULEB128.
pub fn encode_uleb128(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION_BIT);
    }
}

/// Decode a canonical ULEB128 `u32` from the front of `buf`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_uleb128(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_ULEB128_LEN {
            return Err(VarintError::Overflow);
        }
        let data = u64::from(byte & DATA_MASK);
        result |= data << shift;

        if byte & CONTINUATION_BIT == 0 {
            // A zero final group after the first byte means a shorter form existed.
            if i > 0 && data == 0 {
                return Err(VarintError::NonCanonical);
            }
            if result > u64::from(u32::MAX) {
                return Err(VarintError::Overflow);
            }
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    Err(VarintError::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_uleb128(value, &mut out);
        out
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(1), [0x01]);
        assert_eq!(encoded(127), [0x7F]);
        assert_eq!(encoded(128), [0x80, 0x01]);
        assert_eq!(encoded(16384), [0x80, 0x80, 0x01]);
        assert_eq!(encoded(u64::from(u32::MAX)), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_decode_consumes_prefix_only() {
        assert_eq!(decode_uleb128(&[0xAC, 0x02, 0xFF]).unwrap(), (300, 2));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_uleb128(&[]), Err(VarintError::UnexpectedEof));
        assert_eq!(decode_uleb128(&[0x80]), Err(VarintError::UnexpectedEof));
        assert_eq!(decode_uleb128(&[0x80, 0x00]), Err(VarintError::NonCanonical));
        assert_eq!(
            decode_uleb128(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]),
            Err(VarintError::Overflow)
        );
        assert_eq!(
            decode_uleb128(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
            Err(VarintError::Overflow)
        );
    }
}
