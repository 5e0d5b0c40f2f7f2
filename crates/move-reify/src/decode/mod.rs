// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multi-format decoding.
//!
//! Four wire representations converge to the same [`MoveValue`](crate::value::MoveValue):
//!
//! - **Field map**: JSON object keyed by snake_case field names
//! - **Annotated field map**: `{ "type": ..., "fields": ... }`, type verified first
//! - **BCS**: see [`crate::bcs::decode_bcs`]
//! - **JSON document**: `{ "$typeName", "$typeArgs", ...fields }`, type verified first
//!
//! All decoders walk the same [`BinarySchema`](crate::bcs::BinarySchema), so
//! field order, enum variants and well-known aliases are handled identically.

mod fields;
mod json;

pub use fields::{decode_from_annotated_field_map, decode_from_field_map};
pub use json::{decode_from_json, to_json};

use crate::config::{ReifyConfig, WrapperForm, MAX_CONTAINER_DEPTH};

/// Per-decode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Form of `Balance` / `Supply` values.
    pub wrapper_form: WrapperForm,
    /// Maximum container nesting.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            wrapper_form: WrapperForm::Full,
            max_depth: MAX_CONTAINER_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn from_config(config: &ReifyConfig) -> Self {
        Self {
            wrapper_form: config.wrapper_form,
            max_depth: config.max_value_depth,
        }
    }

    #[must_use]
    pub fn with_wrapper_form(mut self, form: WrapperForm) -> Self {
        self.wrapper_form = form;
        self
    }
}
