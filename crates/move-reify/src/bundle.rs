// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode bundle: one instantiated type with its schema and codecs.
//!
//! # Example
//!
//! ```
//! use move_reify::registry::TypeRegistry;
//!
//! let registry = TypeRegistry::with_framework().unwrap();
//! let bundle = registry.resolve("0x1::option::Option<u8>").unwrap();
//!
//! let value = bundle.decode_bcs(&[1, 42]).unwrap();
//! assert_eq!(bundle.encode_bcs(&value).unwrap(), [1, 42]);
//! ```

use crate::bcs::{self, BinarySchema, SchemaCache};
use crate::config::WrapperForm;
use crate::decode::{self, DecodeOptions};
use crate::error::Result;
use crate::types::TypeDescriptor;
use crate::value::MoveValue;
use serde_json::Value;
use std::sync::Arc;

/// Instantiated type plus the decoders and encoders that work on it.
#[derive(Debug, Clone)]
pub struct DecodeBundle {
    descriptor: TypeDescriptor,
    type_name: String,
    schema: Arc<BinarySchema>,
    options: DecodeOptions,
}

impl DecodeBundle {
    /// Build a bundle, reusing `cache` for the schema.
    pub fn new(descriptor: TypeDescriptor, cache: &SchemaCache) -> Result<Self> {
        let schema = cache.get_or_build(&descriptor)?;
        Ok(Self {
            type_name: descriptor.extract_type(),
            descriptor,
            schema,
            options: DecodeOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_wrapper_form(mut self, form: WrapperForm) -> Self {
        self.options.wrapper_form = form;
        self
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Canonical type name, phantom arguments included.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn schema(&self) -> &Arc<BinarySchema> {
        &self.schema
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn decode_fields(&self, fields: &Value) -> Result<MoveValue> {
        decode::decode_from_field_map(&self.schema, fields, &self.options)
    }

    pub fn decode_annotated(&self, item: &Value) -> Result<MoveValue> {
        decode::decode_from_annotated_field_map(&self.descriptor, &self.schema, item, &self.options)
    }

    pub fn decode_bcs(&self, bytes: &[u8]) -> Result<MoveValue> {
        bcs::decode_bcs(&self.schema, bytes, &self.options)
    }

    pub fn decode_json(&self, json: &Value) -> Result<MoveValue> {
        decode::decode_from_json(&self.descriptor, &self.schema, json, &self.options)
    }

    /// [`decode_json`](Self::decode_json) from text.
    pub fn decode_json_str(&self, json: &str) -> Result<MoveValue> {
        let value: Value = serde_json::from_str(json)?;
        self.decode_json(&value)
    }

    pub fn encode_bcs(&self, value: &MoveValue) -> Result<Vec<u8>> {
        bcs::encode_bcs(&self.schema, value)
    }

    pub fn to_json(&self, value: &MoveValue) -> Result<Value> {
        decode::to_json(&self.descriptor, &self.schema, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReifyError;
    use crate::types::PrimitiveKind;

    #[test]
    fn test_primitive_bundle() {
        let cache = SchemaCache::new();
        let bundle =
            DecodeBundle::new(TypeDescriptor::primitive(PrimitiveKind::U16), &cache).unwrap();
        assert_eq!(bundle.type_name(), "u16");
        assert_eq!(bundle.decode_bcs(&[0x34, 0x12]).unwrap(), MoveValue::U16(0x1234));
        assert_eq!(bundle.decode_fields(&Value::from(7)).unwrap(), MoveValue::U16(7));
        // Primitives have no JSON document form.
        assert!(matches!(
            bundle.to_json(&MoveValue::U16(1)),
            Err(ReifyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_json_str_reports_syntax_errors() {
        let cache = SchemaCache::new();
        let bundle =
            DecodeBundle::new(TypeDescriptor::primitive(PrimitiveKind::Bool), &cache).unwrap();
        assert!(matches!(
            bundle.decode_json_str("{not json"),
            Err(ReifyError::Json(_))
        ));
    }
}
