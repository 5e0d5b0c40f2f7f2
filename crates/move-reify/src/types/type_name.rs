// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical type-name parsing and comparison.
//!
//! Type strings have the form `address::module::Name<Arg1, Arg2>` where every
//! argument is itself a type string or a primitive keyword. Argument lists are
//! split by bracket depth: a comma separates arguments only when it is not
//! nested inside an inner `<...>`.
//!
//! ```
//! use move_reify::types::parse_type_name;
//!
//! let parsed = parse_type_name("0x2::pool::Pool<0x2::coin::Coin<0x2::sui::SUI>, u64>").unwrap();
//! assert_eq!(parsed.type_args, vec!["0x2::coin::Coin<0x2::sui::SUI>", "u64"]);
//! ```

use crate::config::MAX_TYPE_DEPTH;
use crate::error::{ReifyError, Result};
use crate::types::address::{normalize_address, short_address};
use std::fmt;
use std::str::FromStr;

/// Head and raw arguments of a datatype name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTypeName {
    /// Normalized address.
    pub address: String,
    /// Module identifier.
    pub module: String,
    /// Datatype identifier.
    pub name: String,
    /// Top-level type arguments, trimmed, not yet parsed.
    pub type_args: Vec<String>,
}

impl ParsedTypeName {
    /// `address::module::Name` without type arguments.
    pub fn bare_name(&self) -> String {
        format!("{}::{}::{}", self.address, self.module, self.name)
    }
}

/// Split a datatype name into its head and top-level type arguments.
pub fn parse_type_name(s: &str) -> Result<ParsedTypeName> {
    let input = s.trim();
    let (head, type_args) = match input.find('<') {
        Some(open) => {
            if !input.ends_with('>') {
                return Err(ReifyError::malformed_type(
                    s,
                    "trailing characters after type argument list",
                ));
            }
            let inner = &input[open + 1..input.len() - 1];
            (&input[..open], split_type_args(inner, s)?)
        }
        None => {
            if input.contains('>') {
                return Err(ReifyError::malformed_type(s, "unbalanced '>'"));
            }
            (input, Vec::new())
        }
    };

    let parts: Vec<&str> = head.trim().split("::").collect();
    if parts.len() != 3 {
        return Err(ReifyError::malformed_type(
            s,
            "expected 'address::module::Name'",
        ));
    }
    let address = normalize_address(parts[0]).map_err(|_| {
        ReifyError::malformed_type(s, format!("invalid address '{}'", parts[0]))
    })?;
    for ident in &parts[1..] {
        if !is_identifier(ident) {
            return Err(ReifyError::malformed_type(
                s,
                format!("invalid identifier '{}'", ident),
            ));
        }
    }

    Ok(ParsedTypeName {
        address,
        module: parts[1].to_string(),
        name: parts[2].to_string(),
        type_args,
    })
}

/// Split an argument list on commas at bracket depth zero.
fn split_type_args(inner: &str, original: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ReifyError::malformed_type(original, "unbalanced '>'"))?;
            }
            ',' if depth == 0 => {
                args.push(take_arg(&inner[start..i], original)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ReifyError::malformed_type(original, "unbalanced '<'"));
    }
    args.push(take_arg(&inner[start..], original)?);
    Ok(args)
}

fn take_arg(raw: &str, original: &str) -> Result<String> {
    let arg = raw.trim();
    if arg.is_empty() {
        return Err(ReifyError::malformed_type(original, "empty type argument"));
    }
    Ok(arg.to_string())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fully parsed type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// Fully parsed datatype reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: String,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    /// `address::module::Name` without type arguments.
    pub fn bare_name(&self) -> String {
        format!("{}::{}::{}", self.address, self.module, self.name)
    }
}

impl TypeTag {
    /// Parse and normalize a type string.
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_at_depth(s, 0)
    }

    fn parse_at_depth(s: &str, depth: usize) -> Result<Self> {
        if depth > MAX_TYPE_DEPTH {
            return Err(ReifyError::malformed_type(s, "type nesting too deep"));
        }
        let input = s.trim();
        let tag = match input {
            "bool" => Self::Bool,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "u256" => Self::U256,
            "address" => Self::Address,
            "signer" => Self::Signer,
            _ if input.starts_with("vector<") => {
                if !input.ends_with('>') {
                    return Err(ReifyError::malformed_type(s, "unterminated vector"));
                }
                let mut args = split_type_args(&input[7..input.len() - 1], s)?;
                if args.len() != 1 {
                    return Err(ReifyError::malformed_type(
                        s,
                        "vector takes exactly one type argument",
                    ));
                }
                let elem = args.remove(0);
                Self::Vector(Box::new(Self::parse_at_depth(&elem, depth + 1)?))
            }
            _ => {
                let parsed = parse_type_name(input)?;
                let type_params = parsed
                    .type_args
                    .iter()
                    .map(|arg| Self::parse_at_depth(arg, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Self::Struct(Box::new(StructTag {
                    address: parsed.address,
                    module: parsed.module,
                    name: parsed.name,
                    type_params,
                }))
            }
        };
        Ok(tag)
    }

    /// Display form with minimal addresses (`0x2::sui::SUI`).
    pub fn to_short_string(&self) -> String {
        match self {
            Self::Vector(elem) => format!("vector<{}>", elem.to_short_string()),
            Self::Struct(tag) => {
                let base = format!(
                    "{}::{}::{}",
                    short_address(&tag.address),
                    tag.module,
                    tag.name
                );
                let args: Vec<String> = tag.type_params.iter().map(Self::to_short_string).collect();
                compose_type_name(&base, &args)
            }
            other => other.to_string(),
        }
    }
}

impl FromStr for TypeTag {
    type Err = ReifyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::U128 => f.write_str("u128"),
            Self::U256 => f.write_str("u256"),
            Self::Address => f.write_str("address"),
            Self::Signer => f.write_str("signer"),
            Self::Vector(elem) => write!(f, "vector<{}>", elem),
            Self::Struct(tag) => {
                let args: Vec<String> = tag.type_params.iter().map(ToString::to_string).collect();
                f.write_str(&compose_type_name(&tag.bare_name(), &args))
            }
        }
    }
}

/// Re-render a type string in canonical form (normalized addresses,
/// `", "` separators).
pub fn normalize_type_name(s: &str) -> Result<String> {
    Ok(TypeTag::parse(s)?.to_string())
}

/// Structural equality after recursive normalization.
///
/// Malformed input never compares equal.
pub fn types_equal(a: &str, b: &str) -> bool {
    match (TypeTag::parse(a), TypeTag::parse(b)) {
        (Ok(left), Ok(right)) => left == right,
        (left, right) => {
            log::trace!(
                "[type_name] comparing malformed types '{}' ({}) and '{}' ({})",
                a,
                left.is_ok(),
                b,
                right.is_ok()
            );
            false
        }
    }
}

/// Build `base<arg1, arg2>`; `base` alone when there are no arguments.
pub fn compose_type_name<S: AsRef<str>>(base: &str, args: &[S]) -> String {
    if args.is_empty() {
        return base.to_string();
    }
    let joined: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    format!("{}<{}>", base, joined.join(", "))
}
