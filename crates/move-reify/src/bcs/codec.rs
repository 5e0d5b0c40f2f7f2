// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! BCS encoding/decoding driven by a [`BinarySchema`].

use crate::bcs::schema::{BinarySchema, EnumLayout, PayloadLayout, StructLayout};
use crate::bcs::varint::{decode_uleb128, encode_uleb128};
use crate::config::{ADDRESS_LENGTH, MAX_CONTAINER_DEPTH, MAX_SEQUENCE_LENGTH};
use crate::decode::DecodeOptions;
use crate::error::{ReifyError, Result};
use crate::types::{address_from_bytes, address_to_bytes, types_equal, PrimitiveKind};
use crate::value::{MoveValue, StructValue, VariantPayload, VariantValue, U256};
use crate::well_known::WellKnown;
use std::sync::Arc;

/// Decode a complete BCS value. Trailing bytes are an error.
pub fn decode_bcs(schema: &BinarySchema, bytes: &[u8], options: &DecodeOptions) -> Result<MoveValue> {
    let mut decoder = BcsDecoder {
        buffer: bytes,
        offset: 0,
        options,
    };
    let value = decoder.decode_value(schema, 0)?;
    if decoder.offset != bytes.len() {
        return Err(ReifyError::MalformedBinary(format!(
            "{} trailing bytes after {}",
            bytes.len() - decoder.offset,
            schema.type_name()
        )));
    }
    Ok(value)
}

/// Encode a value to BCS.
///
/// Accepts both host forms of the well-known aliases (`String`, `Address`,
/// `Option`, plain `U64` wrappers) and their structural struct forms.
pub fn encode_bcs(schema: &BinarySchema, value: &MoveValue) -> Result<Vec<u8>> {
    let mut encoder = BcsEncoder { buffer: Vec::new() };
    encoder.encode_value(schema, value, "", 0)?;
    Ok(encoder.buffer)
}

/// BCS decoder over a borrowed buffer.
struct BcsDecoder<'a> {
    buffer: &'a [u8],
    offset: usize,
    options: &'a DecodeOptions,
}

impl<'a> BcsDecoder<'a> {
    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(ReifyError::MalformedBinary(format!(
                "need {} bytes at offset {}, have {}",
                count,
                self.offset,
                self.remaining()
            )));
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_uleb128(&mut self) -> Result<u64> {
        let (value, len) = decode_uleb128(&self.buffer[self.offset.min(self.buffer.len())..])
            .map_err(|e| {
                ReifyError::MalformedBinary(format!("offset {}: {}", self.offset, e))
            })?;
        self.offset += len;
        Ok(value)
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        let limit = self.options.max_depth.min(MAX_CONTAINER_DEPTH);
        if depth >= limit {
            return Err(ReifyError::MalformedBinary(format!(
                "container depth exceeds {}",
                limit
            )));
        }
        Ok(depth + 1)
    }

    fn decode_value(&mut self, schema: &BinarySchema, depth: usize) -> Result<MoveValue> {
        match schema {
            BinarySchema::Primitive(kind) => self.decode_primitive(*kind),
            BinarySchema::Vector(elem) => {
                let depth = self.enter(depth)?;
                let len = self.read_uleb128()?;
                if len > MAX_SEQUENCE_LENGTH {
                    return Err(ReifyError::MalformedBinary(format!(
                        "vector length {} exceeds {}",
                        len, MAX_SEQUENCE_LENGTH
                    )));
                }
                // Length is untrusted; cap the preallocation by the input left.
                let mut items = Vec::with_capacity((len as usize).min(self.remaining()));
                for _ in 0..len {
                    items.push(self.decode_value(elem, depth)?);
                }
                Ok(MoveValue::Vector(items))
            }
            BinarySchema::Struct(layout) => self.decode_struct(layout, depth),
            BinarySchema::Enum(layout) => self.decode_enum(layout, depth),
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<MoveValue> {
        let value = match kind {
            PrimitiveKind::Bool => match self.read_array::<1>()?[0] {
                0 => MoveValue::Bool(false),
                1 => MoveValue::Bool(true),
                other => {
                    return Err(ReifyError::MalformedBinary(format!(
                        "invalid bool byte {:#04x}",
                        other
                    )))
                }
            },
            PrimitiveKind::U8 => MoveValue::U8(self.read_array::<1>()?[0]),
            PrimitiveKind::U16 => MoveValue::U16(u16::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U32 => MoveValue::U32(u32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U64 => MoveValue::U64(u64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U128 => MoveValue::U128(u128::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U256 => {
                MoveValue::U256(U256::from_little_endian(&self.read_array::<32>()?))
            }
            PrimitiveKind::Address => {
                MoveValue::Address(address_from_bytes(&self.read_array::<ADDRESS_LENGTH>()?))
            }
        };
        Ok(value)
    }

    fn decode_struct(&mut self, layout: &StructLayout, depth: usize) -> Result<MoveValue> {
        let depth = self.enter(depth)?;
        let mut fields = Vec::with_capacity(layout.fields.len());
        for (name, schema) in &layout.fields {
            fields.push((name.clone(), self.decode_value(schema, depth)?));
        }
        let value = StructValue {
            type_name: layout.type_name.clone(),
            fields,
        };
        match layout.well_known {
            Some(wk) => wk
                .lift(value, self.options.wrapper_form)
                .map_err(ReifyError::MalformedBinary),
            None => Ok(MoveValue::Struct(value)),
        }
    }

    fn decode_enum(&mut self, layout: &EnumLayout, depth: usize) -> Result<MoveValue> {
        let depth = self.enter(depth)?;
        let index = self.read_uleb128()?;
        let variant = usize::try_from(index)
            .ok()
            .and_then(|i| layout.variants.get(i))
            .ok_or_else(|| ReifyError::UnknownVariant {
                type_name: layout.type_name.clone(),
                variant: index.to_string(),
            })?;

        let payload = match &variant.payload {
            PayloadLayout::Unit => VariantPayload::Unit,
            PayloadLayout::Named(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, schema) in fields {
                    out.push((name.clone(), self.decode_value(schema, depth)?));
                }
                VariantPayload::Named(out)
            }
            PayloadLayout::Positional(tys) => {
                let mut out = Vec::with_capacity(tys.len());
                for schema in tys {
                    out.push(self.decode_value(schema, depth)?);
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

/// BCS encoder.
struct BcsEncoder {
    buffer: Vec<u8>,
}

impl BcsEncoder {
    fn encode_value(
        &mut self,
        schema: &BinarySchema,
        value: &MoveValue,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        if depth >= MAX_CONTAINER_DEPTH {
            return Err(ReifyError::malformed_value(
                path,
                format!("container depth exceeds {}", MAX_CONTAINER_DEPTH),
            ));
        }
        match (schema, value) {
            (BinarySchema::Primitive(kind), _) => self.encode_primitive(*kind, value, path),
            (BinarySchema::Vector(elem), MoveValue::Vector(items)) => {
                self.write_length(items.len(), path)?;
                for (i, item) in items.iter().enumerate() {
                    self.encode_value(elem, item, &format!("{}[{}]", path, i), depth + 1)?;
                }
                Ok(())
            }
            (BinarySchema::Struct(layout), _) => self.encode_struct(layout, value, path, depth),
            (BinarySchema::Enum(layout), MoveValue::Variant(v)) => {
                self.encode_enum(layout, v, path, depth)
            }
            _ => Err(mismatch(path, schema, value)),
        }
    }

    fn write_length(&mut self, len: usize, path: &str) -> Result<()> {
        if len as u64 > MAX_SEQUENCE_LENGTH {
            return Err(ReifyError::malformed_value(
                path,
                format!("vector length {} exceeds {}", len, MAX_SEQUENCE_LENGTH),
            ));
        }
        encode_uleb128(len as u64, &mut self.buffer);
        Ok(())
    }

    fn encode_primitive(&mut self, kind: PrimitiveKind, value: &MoveValue, path: &str) -> Result<()> {
        match (kind, value) {
            (PrimitiveKind::Bool, MoveValue::Bool(v)) => self.buffer.push(u8::from(*v)),
            (PrimitiveKind::U8, MoveValue::U8(v)) => self.buffer.push(*v),
            (PrimitiveKind::U16, MoveValue::U16(v)) => self.buffer.extend(v.to_le_bytes()),
            (PrimitiveKind::U32, MoveValue::U32(v)) => self.buffer.extend(v.to_le_bytes()),
            (PrimitiveKind::U64, MoveValue::U64(v)) => self.buffer.extend(v.to_le_bytes()),
            (PrimitiveKind::U128, MoveValue::U128(v)) => self.buffer.extend(v.to_le_bytes()),
            (PrimitiveKind::U256, MoveValue::U256(v)) => {
                let mut bytes = [0u8; 32];
                v.to_little_endian(&mut bytes);
                self.buffer.extend(bytes);
            }
            (PrimitiveKind::Address, MoveValue::Address(a)) => self.write_address(a, path)?,
            _ => {
                return Err(ReifyError::malformed_value(
                    path,
                    format!("expected {}, found {}", kind, describe(value)),
                ))
            }
        }
        Ok(())
    }

    fn write_address(&mut self, addr: &str, path: &str) -> Result<()> {
        let bytes = address_to_bytes(addr)
            .map_err(|_| ReifyError::malformed_value(path, format!("invalid address '{}'", addr)))?;
        self.buffer.extend(bytes);
        Ok(())
    }

    fn encode_struct(
        &mut self,
        layout: &StructLayout,
        value: &MoveValue,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        let s = match (value, layout.well_known) {
            (MoveValue::Struct(s), _) => s,
            (MoveValue::String(text), Some(wk)) if wk.is_string() => {
                wk.check_text(text)
                    .map_err(|reason| ReifyError::malformed_value(path, reason))?;
                self.write_length(text.len(), path)?;
                self.buffer.extend(text.as_bytes());
                return Ok(());
            }
            (MoveValue::Address(addr), Some(wk)) if wk.is_id() => {
                return self.write_address(addr, path);
            }
            (MoveValue::Option(inner), Some(WellKnown::Option)) => {
                let elem = option_element(layout).ok_or_else(|| {
                    ReifyError::malformed_value(path, "option layout without vector field")
                })?;
                match inner {
                    None => self.write_length(0, path)?,
                    Some(v) => {
                        self.write_length(1, path)?;
                        self.encode_value(&elem, v, path, depth + 1)?;
                    }
                }
                return Ok(());
            }
            (MoveValue::U64(v), Some(wk)) if wk.is_numeric_wrapper() => {
                self.buffer.extend(v.to_le_bytes());
                return Ok(());
            }
            _ => return Err(mismatch(path, &BinarySchema::Struct(layout.clone()), value)),
        };

        if s.type_name != layout.type_name && !types_equal(&s.type_name, &layout.type_name) {
            return Err(ReifyError::type_mismatch(&layout.type_name, &s.type_name));
        }
        for (name, schema) in &layout.fields {
            let field = s.field(name).ok_or_else(|| {
                ReifyError::malformed_value(path, format!("missing field '{}'", name))
            })?;
            self.encode_value(schema, field, &join(path, name), depth + 1)?;
        }
        Ok(())
    }

    fn encode_enum(
        &mut self,
        layout: &EnumLayout,
        value: &VariantValue,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        if value.type_name != layout.type_name && !types_equal(&value.type_name, &layout.type_name) {
            return Err(ReifyError::type_mismatch(&layout.type_name, &value.type_name));
        }
        let (index, variant) = layout
            .variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == value.variant)
            .ok_or_else(|| ReifyError::UnknownVariant {
                type_name: layout.type_name.clone(),
                variant: value.variant.clone(),
            })?;
        encode_uleb128(index as u64, &mut self.buffer);

        let variant_path = join(path, &variant.name);
        match (&variant.payload, &value.payload) {
            (PayloadLayout::Unit, VariantPayload::Unit) => Ok(()),
            (PayloadLayout::Named(fields), VariantPayload::Named(values)) => {
                for (name, schema) in fields {
                    let field = values
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| {
                            ReifyError::malformed_value(
                                &variant_path,
                                format!("missing field '{}'", name),
                            )
                        })?;
                    self.encode_value(schema, field, &join(&variant_path, name), depth + 1)?;
                }
                Ok(())
            }
            (PayloadLayout::Positional(tys), VariantPayload::Positional(values))
                if tys.len() == values.len() =>
            {
                for (i, (schema, v)) in tys.iter().zip(values).enumerate() {
                    self.encode_value(schema, v, &join(&variant_path, &i.to_string()), depth + 1)?;
                }
                Ok(())
            }
            _ => Err(ReifyError::malformed_value(
                &variant_path,
                "payload shape does not match variant",
            )),
        }
    }
}

/// Element schema of an `Option<T>` layout.
pub(crate) fn option_element(layout: &StructLayout) -> Option<Arc<BinarySchema>> {
    match layout.fields.first().map(|(_, s)| &**s) {
        Some(BinarySchema::Vector(elem)) => Some(Arc::clone(elem)),
        _ => None,
    }
}

pub(crate) fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

pub(crate) fn describe(value: &MoveValue) -> &'static str {
    match value {
        MoveValue::Bool(_) => "bool",
        MoveValue::U8(_) => "u8",
        MoveValue::U16(_) => "u16",
        MoveValue::U32(_) => "u32",
        MoveValue::U64(_) => "u64",
        MoveValue::U128(_) => "u128",
        MoveValue::U256(_) => "u256",
        MoveValue::Address(_) => "address",
        MoveValue::String(_) => "string",
        MoveValue::Option(_) => "option",
        MoveValue::Vector(_) => "vector",
        MoveValue::Struct(_) => "struct",
        MoveValue::Variant(_) => "enum variant",
    }
}

fn mismatch(path: &str, schema: &BinarySchema, value: &MoveValue) -> ReifyError {
    ReifyError::malformed_value(
        path,
        format!("expected {}, found {}", schema.type_name(), describe(value)),
    )
}
