// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary schema: the byte layout of an instantiated type.
//!
//! Phantom type arguments never appear in a schema. Struct fields keep their
//! declared order. Schemas for structs and enums are memoized in a
//! [`SchemaCache`] keyed by canonical type name.

use crate::error::{ReifyError, Result};
use crate::types::{PayloadShape, PrimitiveKind, TypeDescriptor};
use crate::well_known::WellKnown;
use dashmap::DashMap;
use std::sync::Arc;

/// Byte layout of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinarySchema {
    Primitive(PrimitiveKind),
    Vector(Arc<BinarySchema>),
    Struct(StructLayout),
    Enum(EnumLayout),
}

/// Struct layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    /// Canonical name of the instantiation (phantom arguments included).
    pub type_name: String,
    pub well_known: Option<WellKnown>,
    pub fields: Vec<(String, Arc<BinarySchema>)>,
}

/// Enum layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumLayout {
    pub type_name: String,
    /// Indexed by wire tag.
    pub variants: Vec<VariantLayout>,
}

/// Variant layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLayout {
    pub name: String,
    pub payload: PayloadLayout,
}

/// Variant payload layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadLayout {
    Unit,
    Named(Vec<(String, Arc<BinarySchema>)>),
    Positional(Vec<Arc<BinarySchema>>),
}

impl BinarySchema {
    /// Encoded width when it does not depend on the value.
    ///
    /// `None` as soon as a vector or an enum is reachable.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Primitive(kind) => Some(kind.size()),
            Self::Vector(_) | Self::Enum(_) => None,
            Self::Struct(s) => s
                .fields
                .iter()
                .map(|(_, f)| f.fixed_size())
                .sum::<Option<usize>>(),
        }
    }

    /// Canonical type name of the laid-out type.
    pub fn type_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.keyword().to_string(),
            Self::Vector(elem) => format!("vector<{}>", elem.type_name()),
            Self::Struct(s) => s.type_name.clone(),
            Self::Enum(e) => e.type_name.clone(),
        }
    }
}

/// Build a schema without memoization.
pub fn build_schema(descriptor: &TypeDescriptor) -> Result<Arc<BinarySchema>> {
    SchemaBuilder { cache: None }.build(descriptor)
}

/// Memoized schema for `descriptor`.
pub fn to_binary_schema(
    descriptor: &TypeDescriptor,
    cache: &SchemaCache,
) -> Result<Arc<BinarySchema>> {
    cache.get_or_build(descriptor)
}

/// Memoized schemas keyed by canonical type name.
///
/// Concurrent builds of the same schema may race; the first insert wins and
/// the duplicate is dropped.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: DashMap<String, Arc<BinarySchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema for `descriptor`, building (and caching every nested
    /// struct / enum schema) on a miss.
    pub fn get_or_build(&self, descriptor: &TypeDescriptor) -> Result<Arc<BinarySchema>> {
        SchemaBuilder { cache: Some(self) }.build(descriptor)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn clear(&self) {
        self.schemas.clear();
    }
}

struct SchemaBuilder<'a> {
    cache: Option<&'a SchemaCache>,
}

impl SchemaBuilder<'_> {
    fn build(&self, descriptor: &TypeDescriptor) -> Result<Arc<BinarySchema>> {
        match descriptor {
            TypeDescriptor::Primitive(kind) => Ok(Arc::new(BinarySchema::Primitive(*kind))),
            TypeDescriptor::Vector(elem) => Ok(Arc::new(BinarySchema::Vector(self.build(elem)?))),
            TypeDescriptor::Phantom(inner) => Err(ReifyError::type_mismatch(
                "type with a binary layout",
                format!("phantom {}", inner.extract_type()),
            )),
            TypeDescriptor::Struct(_) | TypeDescriptor::Enum(_) => self.build_datatype(descriptor),
        }
    }

    fn build_datatype(&self, descriptor: &TypeDescriptor) -> Result<Arc<BinarySchema>> {
        let type_name = descriptor.extract_type();
        if let Some(cache) = self.cache {
            // The guard must drop before recursing into nested datatypes.
            if let Some(hit) = cache.schemas.get(&type_name).map(|e| Arc::clone(e.value())) {
                log::trace!("[schema] cache hit {}", type_name);
                return Ok(hit);
            }
        }

        let schema = match descriptor {
            TypeDescriptor::Struct(s) => BinarySchema::Struct(StructLayout {
                well_known: WellKnown::classify(&s.name),
                fields: s
                    .fields
                    .iter()
                    .map(|f| Ok((f.name.clone(), self.build(&f.type_desc)?)))
                    .collect::<Result<Vec<_>>>()?,
                type_name: type_name.clone(),
            }),
            TypeDescriptor::Enum(e) => {
                let mut variants = Vec::with_capacity(e.variants.len());
                for variant in &e.variants {
                    let payload = match &variant.payload {
                        PayloadShape::Unit => PayloadLayout::Unit,
                        PayloadShape::Named(fields) => PayloadLayout::Named(
                            fields
                                .iter()
                                .map(|f| Ok((f.name.clone(), self.build(&f.type_desc)?)))
                                .collect::<Result<Vec<_>>>()?,
                        ),
                        PayloadShape::Positional(tys) => PayloadLayout::Positional(
                            tys.iter().map(|t| self.build(t)).collect::<Result<Vec<_>>>()?,
                        ),
                    };
                    variants.push(VariantLayout {
                        name: variant.name.clone(),
                        payload,
                    });
                }
                BinarySchema::Enum(EnumLayout {
                    type_name: type_name.clone(),
                    variants,
                })
            }
            _ => return self.build(descriptor),
        };

        let schema = Arc::new(schema);
        match self.cache {
            Some(cache) => {
                log::debug!("[schema] built {}", type_name);
                Ok(Arc::clone(
                    cache.schemas.entry(type_name).or_insert(schema).value(),
                ))
            }
            None => Ok(schema),
        }
    }
}
