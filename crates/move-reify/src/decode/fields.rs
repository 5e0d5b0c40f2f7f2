// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field-map decoding (plain and annotated).
//!
//! Lenient about representation: integers may be JSON numbers or decimal
//! strings, enum payloads may be inline or under `fields`, and well-known
//! types are accepted both in host form (`"text"`, `"0x.."`, `null`) and in
//! their structural form (`{"bytes": [...]}`, `{"vec": [...]}`).

use super::DecodeOptions;
use crate::bcs::{join, option_element, BinarySchema, EnumLayout, PayloadLayout, StructLayout};
use crate::config::MAX_CONTAINER_DEPTH;
use crate::error::{ReifyError, Result};
use crate::types::{normalize_address, PrimitiveKind, TypeDescriptor, TypeTag};
use crate::value::{MoveValue, StructValue, VariantPayload, VariantValue, U256};
use crate::well_known::WellKnown;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::str::FromStr;

/// Decode a plain field map (`{ "field": value, ... }`).
pub fn decode_from_field_map(
    schema: &BinarySchema,
    fields: &Value,
    options: &DecodeOptions,
) -> Result<MoveValue> {
    FieldWalker::new(options, Mode::Loose).decode(schema, fields, "", 0)
}

/// Decode an annotated item (`{ "type": "...", "fields": { ... } }`).
///
/// The declared type is checked against `descriptor` before any field is
/// read. A declared type without type arguments matches on bare name alone.
pub fn decode_from_annotated_field_map(
    descriptor: &TypeDescriptor,
    schema: &BinarySchema,
    item: &Value,
    options: &DecodeOptions,
) -> Result<MoveValue> {
    let declared = item
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ReifyError::malformed_value("", "annotated item has no 'type'"))?;
    verify_declared_type(&descriptor.extract_type(), declared)?;
    FieldWalker::new(options, Mode::Annotated).decode(schema, item, "", 0)
}

/// `declared` names the same type as `expected`, or its bare name when it
/// carries no type arguments.
fn verify_declared_type(expected: &str, declared: &str) -> Result<()> {
    let expected_tag = TypeTag::parse(expected)?;
    let declared_tag = TypeTag::parse(declared)?;
    let matches = match (&expected_tag, &declared_tag) {
        (TypeTag::Struct(e), TypeTag::Struct(d)) if d.type_params.is_empty() => {
            e.bare_name() == d.bare_name()
        }
        _ => expected_tag == declared_tag,
    };
    if matches {
        Ok(())
    } else {
        Err(ReifyError::type_mismatch(expected, declared))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    /// Plain objects, also used for JSON documents.
    Loose,
    /// Structs may be wrapped as `{ "type", "fields" }`.
    Annotated,
}

/// Schema-driven walker over a JSON tree.
pub(super) struct FieldWalker<'a> {
    options: &'a DecodeOptions,
    mode: Mode,
}

impl<'a> FieldWalker<'a> {
    pub(super) fn new(options: &'a DecodeOptions, mode: Mode) -> Self {
        Self { options, mode }
    }

    fn enter(&self, depth: usize, path: &str) -> Result<usize> {
        let limit = self.options.max_depth.min(MAX_CONTAINER_DEPTH);
        if depth >= limit {
            return Err(ReifyError::malformed_value(
                path,
                format!("container depth exceeds {}", limit),
            ));
        }
        Ok(depth + 1)
    }

    pub(super) fn decode(
        &self,
        schema: &BinarySchema,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<MoveValue> {
        match schema {
            BinarySchema::Primitive(kind) => decode_primitive(*kind, value, path),
            BinarySchema::Vector(elem) => {
                let depth = self.enter(depth, path)?;
                let items = value.as_array().ok_or_else(|| {
                    ReifyError::malformed_value(path, format!("expected array, found {}", kind_of(value)))
                })?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.decode(elem, item, &format!("{}[{}]", path, i), depth))
                    .collect::<Result<Vec<_>>>()
                    .map(MoveValue::Vector)
            }
            BinarySchema::Struct(layout) => self.decode_struct(layout, value, path, depth),
            BinarySchema::Enum(layout) => self.decode_enum(layout, value, path, depth),
        }
    }

    fn decode_struct(
        &self,
        layout: &StructLayout,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<MoveValue> {
        let depth = self.enter(depth, path)?;
        if let Some(wk) = layout.well_known {
            if let Some(host) = self.decode_host_form(wk, layout, value, path, depth)? {
                return Ok(host);
            }
        }

        let object = self.struct_fields(layout, value, path)?;
        let mut fields = Vec::with_capacity(layout.fields.len());
        for (name, schema) in &layout.fields {
            let field_path = join(path, name);
            let raw = object
                .get(name)
                .ok_or_else(|| ReifyError::malformed_value(&field_path, "missing field"))?;
            fields.push((name.clone(), self.decode(schema, raw, &field_path, depth)?));
        }
        let decoded = StructValue {
            type_name: layout.type_name.clone(),
            fields,
        };
        match layout.well_known {
            Some(wk) => wk
                .lift(decoded, self.options.wrapper_form)
                .map_err(|reason| ReifyError::malformed_value(path, reason)),
            None => Ok(MoveValue::Struct(decoded)),
        }
    }

    /// Host-form shortcut for a well-known struct; `None` when `value` is in
    /// structural form.
    fn decode_host_form(
        &self,
        wk: WellKnown,
        layout: &StructLayout,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<Option<MoveValue>> {
        match (wk, value) {
            (wk, Value::String(text)) if wk.is_string() => {
                wk.check_text(text)
                    .map_err(|reason| ReifyError::malformed_value(path, reason))?;
                Ok(Some(MoveValue::String(text.clone())))
            }
            (wk, Value::String(addr)) if wk.is_id() => Ok(Some(MoveValue::Address(
                normalize_address(addr).map_err(|_| {
                    ReifyError::malformed_value(path, format!("invalid address '{}'", addr))
                })?,
            ))),
            (WellKnown::Option, Value::Null) => Ok(Some(MoveValue::Option(None))),
            (WellKnown::Option, _) if !self.is_structural_option(value) => {
                let elem = option_element(layout).ok_or_else(|| {
                    ReifyError::malformed_value(path, "option layout without vector field")
                })?;
                let inner = self.decode(&elem, value, path, depth)?;
                Ok(Some(MoveValue::Option(Some(Box::new(inner)))))
            }
            (wk, Value::Number(_) | Value::String(_)) if wk.is_numeric_wrapper() => {
                let amount = parse_integer::<u64>(value, path, PrimitiveKind::U64)?;
                let decoded = StructValue {
                    type_name: layout.type_name.clone(),
                    fields: vec![(wk.field_name().to_string(), MoveValue::U64(amount))],
                };
                wk.lift(decoded, self.options.wrapper_form)
                    .map(Some)
                    .map_err(|reason| ReifyError::malformed_value(path, reason))
            }
            _ => Ok(None),
        }
    }

    /// `{"vec": [...]}`, or annotated `{"type": "0x1::option::Option<..>", "fields"}`.
    fn is_structural_option(&self, value: &Value) -> bool {
        let Some(object) = value.as_object() else {
            return false;
        };
        if looks_like_structural_option(value) {
            return true;
        }
        self.mode == Mode::Annotated
            && object.contains_key("fields")
            && object
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| TypeTag::parse(t).ok())
                .is_some_and(|tag| {
                    matches!(tag, TypeTag::Struct(s) if WellKnown::classify(&s.bare_name()) == Some(WellKnown::Option))
                })
    }

    fn struct_fields<'v>(
        &self,
        layout: &StructLayout,
        value: &'v Value,
        path: &str,
    ) -> Result<&'v Map<String, Value>> {
        let object = value.as_object().ok_or_else(|| {
            ReifyError::malformed_value(
                path,
                format!("expected object for {}, found {}", layout.type_name, kind_of(value)),
            )
        })?;
        if self.mode == Mode::Annotated {
            if let (Some(declared), Some(fields)) = (object.get("type"), object.get("fields")) {
                let declared = declared
                    .as_str()
                    .ok_or_else(|| ReifyError::malformed_value(path, "'type' is not a string"))?;
                verify_declared_type(&layout.type_name, declared)?;
                return fields
                    .as_object()
                    .ok_or_else(|| ReifyError::malformed_value(path, "'fields' is not an object"));
            }
        }
        Ok(object)
    }

    fn decode_enum(
        &self,
        layout: &EnumLayout,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<MoveValue> {
        let depth = self.enter(depth, path)?;

        // Unit variants may be given by name alone. `$variant` keeps its
        // payload inline; `variant` may carry it under `fields`.
        let (name, source) = match value {
            Value::String(name) => (name.as_str(), None),
            Value::Object(object) => {
                if self.mode == Mode::Annotated {
                    if let Some(declared) = object.get("type").and_then(Value::as_str) {
                        verify_declared_type(&layout.type_name, declared)?;
                    }
                }
                let (name, source) = match (object.get("$variant"), object.get("variant")) {
                    (Some(name), _) => (name, value),
                    (None, Some(name)) => match object.get("fields") {
                        Some(fields @ (Value::Object(_) | Value::Array(_))) => (name, fields),
                        _ => (name, value),
                    },
                    (None, None) => {
                        return Err(ReifyError::malformed_value(path, "enum value has no variant name"))
                    }
                };
                let name = name
                    .as_str()
                    .ok_or_else(|| ReifyError::malformed_value(path, "variant name is not a string"))?;
                (name, Some(source))
            }
            other => {
                return Err(ReifyError::malformed_value(
                    path,
                    format!("expected enum object, found {}", kind_of(other)),
                ))
            }
        };

        let (index, variant) = layout
            .variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == name)
            .ok_or_else(|| ReifyError::UnknownVariant {
                type_name: layout.type_name.clone(),
                variant: name.to_string(),
            })?;
        let variant_path = join(path, name);

        let payload = match (&variant.payload, source) {
            (PayloadLayout::Unit, _) => VariantPayload::Unit,
            (_, None) => {
                return Err(ReifyError::malformed_value(
                    &variant_path,
                    "variant payload missing",
                ))
            }
            (PayloadLayout::Named(fields), Some(source)) => {
                let mut out = Vec::with_capacity(fields.len());
                for (field, schema) in fields {
                    let field_path = join(&variant_path, field);
                    let raw = source
                        .get(field.as_str())
                        .ok_or_else(|| ReifyError::malformed_value(&field_path, "missing field"))?;
                    out.push((field.clone(), self.decode(schema, raw, &field_path, depth)?));
                }
                VariantPayload::Named(out)
            }
            (PayloadLayout::Positional(tys), Some(source)) => {
                let mut out = Vec::with_capacity(tys.len());
                for (i, schema) in tys.iter().enumerate() {
                    let field_path = join(&variant_path, &i.to_string());
                    let raw = positional(source, i)
                        .ok_or_else(|| ReifyError::malformed_value(&field_path, "missing field"))?;
                    out.push(self.decode(schema, raw, &field_path, depth)?);
                }
                VariantPayload::Positional(out)
            }
        };

        Ok(MoveValue::Variant(VariantValue {
            type_name: layout.type_name.clone(),
            variant: variant.name.clone(),
            index: index as u32,
            payload,
        }))
    }
}

/// `{"vec": [...]}` with nothing else but `$`-prefixed document keys.
pub(super) fn looks_like_structural_option(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("vec").is_some_and(Value::is_array)
            && object.keys().all(|k| k == "vec" || k.starts_with('$'))
    })
}

/// Positional payload element: array index, `"0"` or `"pos0"`.
fn positional(source: &Value, index: usize) -> Option<&Value> {
    match source {
        Value::Array(items) => items.get(index),
        Value::Object(object) => object
            .get(&index.to_string())
            .or_else(|| object.get(&format!("pos{}", index))),
        _ => None,
    }
}

fn decode_primitive(kind: PrimitiveKind, value: &Value, path: &str) -> Result<MoveValue> {
    let decoded = match kind {
        PrimitiveKind::Bool => MoveValue::Bool(value.as_bool().ok_or_else(|| {
            ReifyError::malformed_value(path, format!("expected bool, found {}", kind_of(value)))
        })?),
        PrimitiveKind::U8 => MoveValue::U8(parse_integer(value, path, kind)?),
        PrimitiveKind::U16 => MoveValue::U16(parse_integer(value, path, kind)?),
        PrimitiveKind::U32 => MoveValue::U32(parse_integer(value, path, kind)?),
        PrimitiveKind::U64 => MoveValue::U64(parse_integer(value, path, kind)?),
        PrimitiveKind::U128 => MoveValue::U128(parse_integer(value, path, kind)?),
        PrimitiveKind::U256 => MoveValue::U256(parse_digits(value, path, kind, |digits| {
            U256::from_dec_str(digits).ok()
        })?),
        PrimitiveKind::Address => {
            let text = value.as_str().ok_or_else(|| {
                ReifyError::malformed_value(path, format!("expected address, found {}", kind_of(value)))
            })?;
            MoveValue::Address(normalize_address(text).map_err(|_| {
                ReifyError::malformed_value(path, format!("invalid address '{}'", text))
            })?)
        }
    };
    Ok(decoded)
}

/// Unsigned integer from a JSON number or a numeric string, range-checked
/// against the target width.
fn parse_integer<T: FromStr>(value: &Value, path: &str, kind: PrimitiveKind) -> Result<T> {
    parse_digits(value, path, kind, |digits| digits.parse().ok())
}

/// Strict decimal only: no sign, no whitespace, no empty string.
fn parse_digits<T>(
    value: &Value,
    path: &str,
    kind: PrimitiveKind,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T> {
    let text: Cow<'_, str> = match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) if n.is_u64() => Cow::Owned(n.to_string()),
        other => {
            return Err(ReifyError::malformed_value(
                path,
                format!("expected {}, found {}", kind, kind_of(other)),
            ))
        }
    };
    let invalid = || ReifyError::malformed_value(path, format!("'{}' is not a valid {}", text, kind));
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    parse(&text).ok_or_else(invalid)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
