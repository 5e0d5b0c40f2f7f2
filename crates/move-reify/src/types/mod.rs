// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type names, descriptors and generic instantiation.
//!
//! - **Type names**: parse, normalize, compare and compose canonical type strings
//! - **Descriptors**: fully-instantiated reified types
//! - **Templates**: registration-time shapes with type parameters
//! - **Builders**: fluent construction of templates

mod address;
mod builder;
mod descriptor;
mod template;
mod type_name;

pub use address::{address_from_bytes, address_to_bytes, normalize_address, short_address};
pub use builder::{EnumTemplateBuilder, StructTemplateBuilder};
pub use descriptor::{
    extract_type, EnumDescriptor, FieldDescriptor, PayloadShape, PrimitiveKind, StructDescriptor,
    TypeDescriptor, VariantDescriptor,
};
pub(crate) use template::normalize_bare_name;
pub use template::{
    instantiate, instantiate_bounded, DatatypeTemplate, FieldTemplate, PayloadTemplate,
    TemplateBody, TemplateResolver, TemplateType, VariantTemplate,
};
pub use type_name::{
    compose_type_name, normalize_type_name, parse_type_name, types_equal, ParsedTypeName,
    StructTag, TypeTag,
};
