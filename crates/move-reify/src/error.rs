// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by parsing, instantiation, schema building and decoding.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReifyError>;

/// Decode and registry failures.
///
/// Every variant is a local, non-retryable failure. A failure anywhere in a
/// recursive decode aborts the whole decode; partial values are never returned.
#[derive(Debug, Error)]
pub enum ReifyError {
    #[error("Malformed type string '{input}': {reason}")]
    MalformedTypeString { input: String, reason: String },

    #[error("Type argument count mismatch for {type_name}: expected {expected}, got {found}")]
    TypeArgumentCountMismatch {
        type_name: String,
        expected: usize,
        found: usize,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Unknown variant {variant} for enum {type_name}")]
    UnknownVariant { type_name: String, variant: String },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Malformed binary: {0}")]
    MalformedBinary(String),

    #[error("Malformed value at {path}: {reason}")]
    MalformedValue { path: String, reason: String },

    #[error("Invalid template for {type_name}: {reason}")]
    InvalidTemplate { type_name: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReifyError {
    pub(crate) fn malformed_type(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTypeString {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn malformed_value(path: &str, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path.to_string()
            },
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_template(type_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
