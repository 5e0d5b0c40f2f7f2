// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reified type descriptors.
//!
//! A [`TypeDescriptor`] is a fully-instantiated type: every type parameter has
//! been substituted. Phantom arguments stay in the descriptor (they are part of
//! the type's name) but contribute nothing to its binary layout.

use crate::types::type_name::{compose_type_name, TypeTag};
use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
}

impl PrimitiveKind {
    /// Encoded width in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Bool | Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
            Self::U128 => 16,
            Self::U256 | Self::Address => 32,
        }
    }

    /// Source-language keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
            Self::Address => "address",
        }
    }

    /// Map a parsed tag to a primitive, if it is one.
    pub fn from_tag(tag: &TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Bool => Some(Self::Bool),
            TypeTag::U8 => Some(Self::U8),
            TypeTag::U16 => Some(Self::U16),
            TypeTag::U32 => Some(Self::U32),
            TypeTag::U64 => Some(Self::U64),
            TypeTag::U128 => Some(Self::U128),
            TypeTag::U256 => Some(Self::U256),
            TypeTag::Address => Some(Self::Address),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A fully-instantiated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Fixed-width primitive.
    Primitive(PrimitiveKind),
    /// `vector<T>`.
    Vector(Arc<TypeDescriptor>),
    /// Phantom type argument: named, never laid out.
    Phantom(Arc<TypeDescriptor>),
    /// Struct instantiation.
    Struct(Arc<StructDescriptor>),
    /// Enum instantiation.
    Enum(Arc<EnumDescriptor>),
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    pub fn vector_of(element: TypeDescriptor) -> Self {
        Self::Vector(Arc::new(element))
    }

    /// Wrap as phantom; already-phantom descriptors are returned unchanged.
    pub fn phantom_of(inner: TypeDescriptor) -> Self {
        match inner {
            Self::Phantom(_) => inner,
            other => Self::Phantom(Arc::new(other)),
        }
    }

    pub fn is_phantom(&self) -> bool {
        matches!(self, Self::Phantom(_))
    }

    /// The descriptor with any phantom marker removed.
    pub fn strip_phantom(&self) -> &TypeDescriptor {
        match self {
            Self::Phantom(inner) => inner.strip_phantom(),
            other => other,
        }
    }

    /// Bare datatype name (`address::module::Name`) for structs and enums.
    pub fn datatype_name(&self) -> Option<&str> {
        match self.strip_phantom() {
            Self::Struct(s) => Some(&s.name),
            Self::Enum(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Type arguments of a struct or enum instantiation.
    pub fn type_args(&self) -> &[TypeDescriptor] {
        match self.strip_phantom() {
            Self::Struct(s) => &s.type_args,
            Self::Enum(e) => &e.type_args,
            _ => &[],
        }
    }

    /// Canonical name, phantom arguments included.
    pub fn extract_type(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.keyword().to_string(),
            Self::Vector(elem) => format!("vector<{}>", elem.extract_type()),
            Self::Phantom(inner) => inner.extract_type(),
            Self::Struct(s) => compose_args(&s.name, &s.type_args),
            Self::Enum(e) => compose_args(&e.name, &e.type_args),
        }
    }
}

fn compose_args(name: &str, args: &[TypeDescriptor]) -> String {
    let args: Vec<String> = args.iter().map(TypeDescriptor::extract_type).collect();
    compose_type_name(name, &args)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extract_type())
    }
}

/// Canonical name of a descriptor (free-function form of
/// [`TypeDescriptor::extract_type`]).
pub fn extract_type(descriptor: &TypeDescriptor) -> String {
    descriptor.extract_type()
}

/// Struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_desc: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Instantiated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    /// Normalized bare name.
    pub name: String,
    pub type_args: Vec<TypeDescriptor>,
    pub phantom_flags: Vec<bool>,
    /// Fields in declared order.
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Variant payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    Unit,
    Named(Vec<FieldDescriptor>),
    Positional(Vec<TypeDescriptor>),
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub name: String,
    /// Wire tag; equals the variant's declaration position.
    pub index: u32,
    pub payload: PayloadShape,
}

/// Instantiated enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Normalized bare name.
    pub name: String,
    pub type_args: Vec<TypeDescriptor>,
    pub phantom_flags: Vec<bool>,
    /// Variants ordered by index.
    pub variants: Vec<VariantDescriptor>,
}

impl EnumDescriptor {
    pub fn variant(&self, name: &str) -> Option<&VariantDescriptor> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_by_index(&self, index: u64) -> Option<&VariantDescriptor> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.variants.get(i))
    }
}
