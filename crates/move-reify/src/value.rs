// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host-side decoded values.

pub use primitive_types::U256;

/// A decoded value.
///
/// Integers wider than 32 bits keep their full precision (`u64`, `u128`,
/// [`U256`]); none of the decoders go through floating point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    /// Normalized `0x` + 64 hex digits. Also used for `ID` / `UID`.
    Address(String),

    // Well-known aliases
    /// `std::string::String` or `std::ascii::String`.
    String(String),
    /// `std::option::Option<T>`.
    Option(Option<Box<MoveValue>>),

    // Composites
    Vector(Vec<MoveValue>),
    Struct(StructValue),
    Variant(VariantValue),
}

/// Decoded struct: canonical type name plus fields in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructValue {
    pub type_name: String,
    pub fields: Vec<(String, MoveValue)>,
}

impl StructValue {
    pub fn field(&self, name: &str) -> Option<&MoveValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Decoded enum value: carries enough to re-encode without outside context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantValue {
    pub type_name: String,
    pub variant: String,
    pub index: u32,
    pub payload: VariantPayload,
}

/// Payload of a decoded enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantPayload {
    Unit,
    Named(Vec<(String, MoveValue)>),
    Positional(Vec<MoveValue>),
}

impl MoveValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Self::U128(v) => Some(*v),
            _ => None,
        }
    }

    /// Text of a string value or an address.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Address(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[MoveValue]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantValue> {
        match self {
            Self::Variant(v) => Some(v),
            _ => None,
        }
    }

    /// Struct field by name.
    pub fn field(&self, name: &str) -> Option<&MoveValue> {
        self.as_struct()?.field(name)
    }

    /// Enum variant name.
    pub fn variant_name(&self) -> Option<&str> {
        self.as_variant().map(|v| v.variant.as_str())
    }
}

impl From<bool> for MoveValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for MoveValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for MoveValue {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for MoveValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for MoveValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<u128> for MoveValue {
    fn from(v: u128) -> Self {
        Self::U128(v)
    }
}

impl From<U256> for MoveValue {
    fn from(v: U256) -> Self {
        Self::U256(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_conversions() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(U256::from_dec_str(max).unwrap(), U256::MAX);
        assert_eq!(U256::MAX.to_string(), max);
        assert_eq!(
            MoveValue::from(U256::from(u128::MAX)),
            MoveValue::U256(U256::from_dec_str(&u128::MAX.to_string()).unwrap())
        );
    }

    #[test]
    fn test_value_accessors() {
        let s = MoveValue::Struct(StructValue {
            type_name: "0x1::m::S".into(),
            fields: vec![("a".into(), MoveValue::from(7u64))],
        });
        assert_eq!(s.field("a").and_then(MoveValue::as_u64), Some(7));
        assert!(s.field("b").is_none());
        assert_eq!(MoveValue::String("hi".into()).as_str(), Some("hi"));
        assert!(MoveValue::U8(1).as_bool().is_none());
    }
}
