// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global constants and runtime configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire-format constants (address width, BCS limits)
//!   and the framework package addresses.
//! - **Level 2 (Dynamic)**: [`ReifyConfig`], threaded into a
//!   [`TypeRegistry`](crate::registry::TypeRegistry) at construction.
//!
//! # Example
//!
//! ```
//! use move_reify::config::ReifyConfig;
//!
//! let config = ReifyConfig::from_json_str(r#"{ "max_value_depth": 64 }"#).unwrap();
//! assert_eq!(config.max_value_depth, 64);
//! assert!(config.cache_bundles);
//! ```

use crate::error::Result;
use serde::Deserialize;

// =======================================================================
// Wire format
// =======================================================================

/// Width of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// Number of hex digits in a normalized address (without `0x`).
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

/// Largest vector length accepted by BCS (`2^31 - 1`).
pub const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

/// Largest container nesting accepted by BCS.
pub const MAX_CONTAINER_DEPTH: usize = 500;

/// Nesting bound for type arguments and datatype references during
/// instantiation.
pub const MAX_TYPE_DEPTH: usize = 128;

// =======================================================================
// Framework packages
// =======================================================================

/// Standard library package (`0x1`).
pub const MOVE_STDLIB_ADDRESS: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

/// Sui framework package (`0x2`).
pub const SUI_FRAMEWORK_ADDRESS: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002";

// =======================================================================
// Runtime configuration
// =======================================================================

/// How single-field numeric wrappers (`Balance<T>`, `Supply<T>`) are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperForm {
    /// Keep the wrapper struct with its `value` field.
    #[default]
    Full,
    /// Collapse the wrapper to its inner `u64`.
    Plain,
}

/// Registry and decoder limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReifyConfig {
    /// Maximum value nesting accepted by every decoder.
    #[serde(default = "default_value_depth")]
    pub max_value_depth: usize,

    /// Maximum type nesting accepted by the parser and by instantiation.
    #[serde(default = "default_type_depth")]
    pub max_type_depth: usize,

    /// Keep resolved bundles keyed by canonical type name.
    #[serde(default = "default_true")]
    pub cache_bundles: bool,

    /// Default wrapper form for decoders created by the registry.
    #[serde(default)]
    pub wrapper_form: WrapperForm,
}

fn default_value_depth() -> usize {
    MAX_CONTAINER_DEPTH
}

fn default_type_depth() -> usize {
    MAX_TYPE_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for ReifyConfig {
    fn default() -> Self {
        Self {
            max_value_depth: default_value_depth(),
            max_type_depth: default_type_depth(),
            cache_bundles: true,
            wrapper_form: WrapperForm::Full,
        }
    }
}

impl ReifyConfig {
    /// Parse a configuration document; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default wrapper form.
    #[must_use]
    pub fn with_wrapper_form(mut self, form: WrapperForm) -> Self {
        self.wrapper_form = form;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReifyConfig::default();
        assert_eq!(config.max_value_depth, 500);
        assert_eq!(config.max_type_depth, 128);
        assert_eq!(config.wrapper_form, WrapperForm::Full);
    }

    #[test]
    fn test_partial_document() {
        let config =
            ReifyConfig::from_json_str(r#"{ "wrapper_form": "plain", "cache_bundles": false }"#)
                .unwrap();
        assert_eq!(config.wrapper_form, WrapperForm::Plain);
        assert!(!config.cache_bundles);
        assert_eq!(config.max_value_depth, MAX_CONTAINER_DEPTH);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ReifyConfig::from_json_str("{ not json").is_err());
    }
}
