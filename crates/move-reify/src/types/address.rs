// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Address normalization.
//!
//! Canonical form: lowercase, `0x` prefix, left-padded to 64 hex digits.
//! Every comparison, cache key and composed type name uses this form.

use crate::config::{ADDRESS_HEX_LENGTH, ADDRESS_LENGTH};
use crate::error::{ReifyError, Result};

/// Normalize an address literal (`0x2`, `0X02`, `2`, full width) to
/// `0x` + 64 lowercase hex digits.
pub fn normalize_address(addr: &str) -> Result<String> {
    let trimmed = addr.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(ReifyError::malformed_type(addr, "empty address"));
    }
    if digits.len() > ADDRESS_HEX_LENGTH {
        return Err(ReifyError::malformed_type(
            addr,
            format!("address longer than {} hex digits", ADDRESS_HEX_LENGTH),
        ));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ReifyError::malformed_type(addr, "address is not hex"));
    }

    let mut out = String::with_capacity(ADDRESS_HEX_LENGTH + 2);
    out.push_str("0x");
    for _ in digits.len()..ADDRESS_HEX_LENGTH {
        out.push('0');
    }
    out.push_str(&digits.to_ascii_lowercase());
    Ok(out)
}

/// Minimal display form (`0x2`). Input must already be normalized.
pub fn short_address(normalized: &str) -> String {
    let digits = normalized.trim_start_matches("0x").trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", digits)
    }
}

/// Render 32 raw bytes as a normalized address.
pub fn address_from_bytes(bytes: &[u8; ADDRESS_LENGTH]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse any accepted address literal into its 32 raw bytes.
pub fn address_to_bytes(addr: &str) -> Result<[u8; ADDRESS_LENGTH]> {
    let normalized = normalize_address(addr)?;
    let mut out = [0u8; ADDRESS_LENGTH];
    hex::decode_to_slice(&normalized[2..], &mut out)
        .map_err(|e| ReifyError::malformed_type(addr, format!("address is not hex: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = "0x0000000000000000000000000000000000000000000000000000000000000002";

    #[test]
    fn test_normalize_forms() {
        assert_eq!(normalize_address("0x2").unwrap(), TWO);
        assert_eq!(normalize_address("2").unwrap(), TWO);
        assert_eq!(normalize_address("0X02").unwrap(), TWO);
        assert_eq!(normalize_address(TWO).unwrap(), TWO);
        assert_eq!(
            normalize_address("0xABCDEF").unwrap(),
            "0x0000000000000000000000000000000000000000000000000000000000abcdef"
        );
    }

    #[test]
    fn test_normalize_rejects() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("0x").is_err());
        assert!(normalize_address("0xzz").is_err());
        let too_long = format!("0x{}", "1".repeat(65));
        assert!(normalize_address(&too_long).is_err());
    }

    #[test]
    fn test_short_form() {
        assert_eq!(short_address(TWO), "0x2");
        assert_eq!(short_address(&normalize_address("0x0").unwrap()), "0x0");
    }

    #[test]
    fn test_bytes_conversion() {
        let bytes = address_to_bytes("0xab").unwrap();
        assert_eq!(bytes[31], 0xab);
        assert!(bytes[..31].iter().all(|b| *b == 0));
        assert_eq!(
            address_from_bytes(&bytes),
            normalize_address("0xab").unwrap()
        );

        let mut mixed = [0u8; ADDRESS_LENGTH];
        mixed[0] = 0xde;
        mixed[31] = 0x0f;
        let text = address_from_bytes(&mixed);
        assert!(text.starts_with("0xde00"));
        assert!(text.ends_with("000f"));
        assert_eq!(address_to_bytes(&text.to_ascii_uppercase()).unwrap(), mixed);
    }
}
