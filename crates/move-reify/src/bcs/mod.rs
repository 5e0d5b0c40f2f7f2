// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary Canonical Serialization (BCS).
//!
//! - **Schema**: byte layout derived from a [`TypeDescriptor`](crate::types::TypeDescriptor), memoized
//! - **Codec**: schema-driven encode / decode
//! - **Varint**: ULEB128 lengths and variant tags

mod codec;
mod schema;
mod varint;

pub(crate) use codec::{describe, join, option_element};
pub use codec::{decode_bcs, encode_bcs};
pub use schema::{
    build_schema, to_binary_schema, BinarySchema, EnumLayout, PayloadLayout, SchemaCache, StructLayout,
    VariantLayout,
};
pub use varint::{decode_uleb128, encode_uleb128, VarintError, MAX_ULEB128_LEN};

#[cfg(test)]
mod tests;
