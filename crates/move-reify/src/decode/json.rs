// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing JSON documents.
//!
//! ```text
//! {
//!   "$typeName": "0x...::pool::Pool",
//!   "$typeArgs": ["0x...::sui::SUI", "u64"],
//!   "reserve": "1000",
//!   ...
//! }
//! ```
//!
//! Integers wider than 32 bits are strings, `Option` is `null` or the inner
//! value (`{"vec": [inner]}` when the bare inner value would be ambiguous),
//! enums carry a `$variant` key with inline named fields or `"0"`, `"1"`, ...
//! keys for positional payloads.

use super::fields::{looks_like_structural_option, FieldWalker, Mode};
use super::DecodeOptions;
use crate::bcs::{describe, BinarySchema, StructLayout};
use crate::error::{ReifyError, Result};
use crate::types::{compose_type_name, types_equal, TypeDescriptor};
use crate::value::{MoveValue, VariantPayload, VariantValue};
use crate::well_known::WellKnown;
use serde_json::{Map, Value};

const TYPE_NAME_KEY: &str = "$typeName";
const TYPE_ARGS_KEY: &str = "$typeArgs";
const VARIANT_KEY: &str = "$variant";

/// Decode a JSON document after checking `$typeName` and `$typeArgs`.
pub fn decode_from_json(
    descriptor: &TypeDescriptor,
    schema: &BinarySchema,
    json: &Value,
    options: &DecodeOptions,
) -> Result<MoveValue> {
    let object = json
        .as_object()
        .ok_or_else(|| ReifyError::malformed_value("", "JSON document is not an object"))?;
    let expected_name = descriptor.datatype_name().ok_or_else(|| {
        ReifyError::type_mismatch("struct or enum type", descriptor.extract_type())
    })?;

    let declared_name = object
        .get(TYPE_NAME_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ReifyError::malformed_value("", "missing '$typeName'"))?;
    if !types_equal(declared_name, expected_name) {
        return Err(ReifyError::type_mismatch(expected_name, declared_name));
    }

    let declared_args = match object.get(TYPE_ARGS_KEY) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| ReifyError::malformed_value("", "'$typeArgs' entry is not a string"))
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(ReifyError::malformed_value("", "'$typeArgs' is not an array"));
        }
    };
    let expected_args: Vec<String> = descriptor
        .type_args()
        .iter()
        .map(TypeDescriptor::extract_type)
        .collect();
    if declared_args.len() != expected_args.len() {
        return Err(ReifyError::type_mismatch(
            descriptor.extract_type(),
            compose_type_name(declared_name, &declared_args),
        ));
    }
    for (declared, expected) in declared_args.iter().zip(&expected_args) {
        if !types_equal(declared, expected) {
            return Err(ReifyError::type_mismatch(
                descriptor.extract_type(),
                compose_type_name(declared_name, &declared_args),
            ));
        }
    }

    FieldWalker::new(options, Mode::Loose).decode(schema, json, "", 0)
}

/// Render a decoded value as a JSON document.
pub fn to_json(
    descriptor: &TypeDescriptor,
    schema: &BinarySchema,
    value: &MoveValue,
) -> Result<Value> {
    let type_name = descriptor.datatype_name().ok_or_else(|| {
        ReifyError::type_mismatch("struct or enum type", descriptor.extract_type())
    })?;

    let mut document = Map::new();
    document.insert(TYPE_NAME_KEY.into(), Value::String(type_name.to_string()));
    document.insert(
        TYPE_ARGS_KEY.into(),
        Value::Array(
            descriptor
                .type_args()
                .iter()
                .map(|arg| Value::String(arg.extract_type()))
                .collect(),
        ),
    );

    let expected = descriptor.extract_type();
    let body = match (schema, value) {
        (_, MoveValue::Struct(s)) => {
            check_value_type(&expected, &s.type_name)?;
            fields_to_json(&s.fields)
        }
        (_, MoveValue::Variant(v)) => {
            check_value_type(&expected, &v.type_name)?;
            variant_to_json(v)
        }
        (BinarySchema::Struct(layout), other) => structural_to_json(layout, other)?,
        (_, other) => {
            return Err(ReifyError::type_mismatch(
                type_name,
                describe(other),
            ))
        }
    };
    document.extend(body);
    Ok(Value::Object(document))
}

fn check_value_type(expected: &str, found: &str) -> Result<()> {
    if expected == found || types_equal(expected, found) {
        Ok(())
    } else {
        Err(ReifyError::type_mismatch(expected, found))
    }
}

/// Nested value rendering.
fn value_to_json(value: &MoveValue) -> Value {
    match value {
        MoveValue::Bool(v) => Value::Bool(*v),
        MoveValue::U8(v) => Value::from(*v),
        MoveValue::U16(v) => Value::from(*v),
        MoveValue::U32(v) => Value::from(*v),
        MoveValue::U64(v) => Value::String(v.to_string()),
        MoveValue::U128(v) => Value::String(v.to_string()),
        MoveValue::U256(v) => Value::String(v.to_string()),
        MoveValue::Address(v) | MoveValue::String(v) => Value::String(v.clone()),
        MoveValue::Option(None) => Value::Null,
        MoveValue::Option(Some(inner)) => some_to_json(inner),
        MoveValue::Vector(items) => Value::Array(items.iter().map(value_to_json).collect()),
        MoveValue::Struct(s) => Value::Object(fields_to_json(&s.fields)),
        MoveValue::Variant(v) => Value::Object(variant_to_json(v)),
    }
}

/// `Some(x)` renders as `x` unless that reads back as `None` or as a
/// structural option, in which case it is wrapped as `{"vec": [x]}`.
fn some_to_json(inner: &MoveValue) -> Value {
    let rendered = value_to_json(inner);
    if rendered.is_null() || looks_like_structural_option(&rendered) {
        let mut object = Map::new();
        object.insert("vec".into(), Value::Array(vec![rendered]));
        Value::Object(object)
    } else {
        rendered
    }
}

fn fields_to_json(fields: &[(String, MoveValue)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), value_to_json(value)))
        .collect()
}

fn variant_to_json(value: &VariantValue) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(VARIANT_KEY.into(), Value::String(value.variant.clone()));
    match &value.payload {
        VariantPayload::Unit => {}
        VariantPayload::Named(fields) => object.extend(fields_to_json(fields)),
        VariantPayload::Positional(items) => {
            for (i, item) in items.iter().enumerate() {
                object.insert(i.to_string(), value_to_json(item));
            }
        }
    }
    object
}

/// Top-level well-known value in its structural form, so the document still
/// has a field map next to `$typeName`.
fn structural_to_json(layout: &StructLayout, value: &MoveValue) -> Result<Map<String, Value>> {
    let wk = layout.well_known.ok_or_else(|| {
        ReifyError::type_mismatch(&layout.type_name, describe(value))
    })?;
    let inner = match (wk, value) {
        (wk, MoveValue::String(text)) if wk.is_string() => {
            Value::Array(text.bytes().map(Value::from).collect())
        }
        (wk, MoveValue::Address(addr)) if wk.is_id() => Value::String(addr.clone()),
        (WellKnown::Option, MoveValue::Option(inner)) => {
            Value::Array(inner.iter().map(|v| value_to_json(v)).collect())
        }
        (wk, MoveValue::U64(amount)) if wk.is_numeric_wrapper() => Value::String(amount.to_string()),
        (_, other) => {
            return Err(ReifyError::type_mismatch(&layout.type_name, describe(other)));
        }
    };
    let mut object = Map::new();
    object.insert(wk.field_name().to_string(), inner);
    Ok(object)
}
