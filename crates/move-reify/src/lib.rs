// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # move-reify - Reified Move types and multi-format value decoding
//!
//! Runtime descriptors for generic Move structs and enums, with one decoder
//! per wire representation that all produce the same [`MoveValue`].
//!
//! ## Quick Start
//!
//! ```rust
//! use move_reify::{MoveValue, Result, TypeRegistry};
//!
//! fn main() -> Result<()> {
//!     let registry = TypeRegistry::with_framework()?;
//!     let coin = registry.resolve("0x2::coin::Coin<0x2::sui::SUI>")?;
//!
//!     let mut bytes = vec![0u8; 32];
//!     bytes.extend(250u64.to_le_bytes());
//!     let value = coin.decode_bcs(&bytes)?;
//!
//!     let balance = value.field("balance").and_then(|b| b.field("value"));
//!     assert_eq!(balance, Some(&MoveValue::U64(250)));
//!
//!     let json = coin.to_json(&value)?;
//!     assert_eq!(coin.decode_json(&json)?, value);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  TypeRegistry: bare name -> DatatypeTemplate, resolve(type string)   |
//! +---------------------------------------------------------------------+
//! |  TypeDescriptor: instantiated, phantom-aware                         |
//! +---------------------------------------------------------------------+
//! |  BinarySchema (memoized): byte layout, well-known tags               |
//! +---------------------------------------------------------------------+
//! |  Field map | Annotated field map | BCS | JSON document  -> MoveValue |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeRegistry`] | Template registration and type-string resolution |
//! | [`DecodeBundle`] | One instantiated type with its schema and codecs |
//! | [`TypeDescriptor`] | Fully instantiated type |
//! | [`BinarySchema`] | BCS byte layout |
//! | [`MoveValue`] | Decoded value |
//!
//! ## Modules Overview
//!
//! - [`types`] - Type names, descriptors, templates and builders
//! - [`bcs`] - Schemas and the BCS codec
//! - [`decode`] - Field-map, annotated and JSON decoders
//! - [`well_known`] - Framework types with host-side shortcuts
//! - [`registry`] - Registry and process-wide instance

/// Decode bundle (descriptor + schema + codecs).
pub mod bundle;
/// Binary Canonical Serialization: schemas, codec, ULEB128.
pub mod bcs;
/// Wire constants and runtime configuration.
pub mod config;
/// Field-map, annotated field-map and JSON document decoding.
pub mod decode;
/// Error type.
pub mod error;
/// Struct/enum registry.
pub mod registry;
/// Type names, descriptors and templates.
pub mod types;
/// Decoded values.
pub mod value;
/// Framework types with host-side shortcuts.
pub mod well_known;

pub use bcs::{build_schema, decode_bcs, encode_bcs, BinarySchema, SchemaCache};
pub use bundle::DecodeBundle;
pub use config::{ReifyConfig, WrapperForm};
pub use decode::{
    decode_from_annotated_field_map, decode_from_field_map, decode_from_json, to_json,
    DecodeOptions,
};
pub use error::{ReifyError, Result};
pub use registry::{global_registry, TypeRegistry};
pub use types::{
    compose_type_name, extract_type, instantiate, normalize_address, normalize_type_name,
    parse_type_name, types_equal, DatatypeTemplate, EnumTemplateBuilder, StructTemplateBuilder,
    TemplateType, TypeDescriptor, TypeTag,
};
pub use value::{MoveValue, StructValue, VariantPayload, VariantValue, U256};
pub use well_known::WellKnown;
