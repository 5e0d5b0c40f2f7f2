// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Framework types with a host-side shortcut.
//!
//! These keep their structural binary layout (a `String` is still
//! `struct { bytes: vector<u8> }` on the wire) but every decoder maps them to
//! a host primitive:
//!
//! | Type | Host value |
//! |------|------------|
//! | `0x1::string::String`, `0x1::ascii::String` | [`MoveValue::String`] |
//! | `0x2::object::ID`, `0x2::object::UID` | [`MoveValue::Address`] |
//! | `0x1::option::Option<T>` | [`MoveValue::Option`] |
//! | `0x2::balance::Balance<T>`, `0x2::balance::Supply<T>` | struct, or `U64` in [`WrapperForm::Plain`] |

use crate::config::WrapperForm;
use crate::error::Result;
use crate::types::{DatatypeTemplate, StructTemplateBuilder, TemplateType};
use crate::value::{MoveValue, StructValue};

pub const UTF8_STRING: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001::string::String";
pub const ASCII_STRING: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001::ascii::String";
pub const OPTION: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001::option::Option";
pub const TYPE_NAME: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001::type_name::TypeName";
pub const OBJECT_ID: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::object::ID";
pub const OBJECT_UID: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::object::UID";
pub const BALANCE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::balance::Balance";
pub const SUPPLY: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::balance::Supply";
pub const URL: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::url::Url";
pub const COIN: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::coin::Coin";
pub const SUI: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";
pub const DYNAMIC_FIELD: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::dynamic_field::Field";

/// Framework struct with a host-side shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    Utf8String,
    AsciiString,
    Id,
    Uid,
    Option,
    Balance,
    Supply,
}

impl WellKnown {
    /// Classify a normalized bare name.
    pub fn classify(bare_name: &str) -> Option<Self> {
        match bare_name {
            UTF8_STRING => Some(Self::Utf8String),
            ASCII_STRING => Some(Self::AsciiString),
            OBJECT_ID => Some(Self::Id),
            OBJECT_UID => Some(Self::Uid),
            OPTION => Some(Self::Option),
            BALANCE => Some(Self::Balance),
            SUPPLY => Some(Self::Supply),
            _ => None,
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, Self::Utf8String | Self::AsciiString)
    }

    pub fn is_id(self) -> bool {
        matches!(self, Self::Id | Self::Uid)
    }

    pub fn is_numeric_wrapper(self) -> bool {
        matches!(self, Self::Balance | Self::Supply)
    }

    /// Name of the single structural field.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Utf8String | Self::AsciiString | Self::Id => "bytes",
            Self::Uid => "id",
            Self::Option => "vec",
            Self::Balance | Self::Supply => "value",
        }
    }

    /// Validate decoded text against the string flavour.
    pub fn check_text(self, text: &str) -> std::result::Result<(), String> {
        if self == Self::AsciiString && !text.is_ascii() {
            return Err("ascii string contains non-ASCII characters".into());
        }
        Ok(())
    }

    /// Turn a structurally decoded struct into its host form.
    ///
    /// Returns a reason string on failure; callers wrap it in the error kind
    /// of their wire format.
    pub fn lift(
        self,
        value: StructValue,
        form: WrapperForm,
    ) -> std::result::Result<MoveValue, String> {
        if self.is_numeric_wrapper() && form == WrapperForm::Full {
            return Ok(MoveValue::Struct(value));
        }
        let type_name = value.type_name.clone();
        let Some((_, inner)) = value.fields.into_iter().next() else {
            return Err(format!("{} has no fields", type_name));
        };
        match (self, inner) {
            (Self::Utf8String | Self::AsciiString, MoveValue::Vector(items)) => {
                let bytes = items
                    .into_iter()
                    .map(|v| match v {
                        MoveValue::U8(b) => Ok(b),
                        other => Err(format!("string byte is not u8: {:?}", other)),
                    })
                    .collect::<std::result::Result<Vec<u8>, String>>()?;
                let text = String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))?;
                self.check_text(&text)?;
                Ok(MoveValue::String(text))
            }
            (Self::Id | Self::Uid, MoveValue::Address(addr)) => Ok(MoveValue::Address(addr)),
            (Self::Option, MoveValue::Vector(mut items)) => match items.len() {
                0 => Ok(MoveValue::Option(None)),
                1 => Ok(MoveValue::Option(items.pop().map(Box::new))),
                n => Err(format!("option carries {} elements", n)),
            },
            (Self::Balance | Self::Supply, v @ MoveValue::U64(_)) => Ok(v),
            (_, other) => Err(format!("unexpected inner value for {}: {:?}", type_name, other)),
        }
    }
}

/// Templates for the framework types every registry can decode.
pub fn framework_templates() -> Result<Vec<DatatypeTemplate>> {
    let uid = || TemplateType::datatype(OBJECT_UID, vec![]);
    let ascii = || TemplateType::datatype(ASCII_STRING, vec![]);
    Ok(vec![
        StructTemplateBuilder::new(UTF8_STRING)
            .field("bytes", TemplateType::vector(TemplateType::u8()))
            .build()?,
        StructTemplateBuilder::new(ASCII_STRING)
            .field("bytes", TemplateType::vector(TemplateType::u8()))
            .build()?,
        StructTemplateBuilder::new(OPTION)
            .type_param()
            .field("vec", TemplateType::vector(TemplateType::param(0)))
            .build()?,
        StructTemplateBuilder::new(TYPE_NAME)
            .field("name", ascii())
            .build()?,
        StructTemplateBuilder::new(OBJECT_ID)
            .field("bytes", TemplateType::address())
            .build()?,
        StructTemplateBuilder::new(OBJECT_UID)
            .field("id", TemplateType::datatype(OBJECT_ID, vec![]))
            .build()?,
        StructTemplateBuilder::new(BALANCE)
            .phantom_param()
            .field("value", TemplateType::u64())
            .build()?,
        StructTemplateBuilder::new(SUPPLY)
            .phantom_param()
            .field("value", TemplateType::u64())
            .build()?,
        StructTemplateBuilder::new(URL).field("url", ascii()).build()?,
        StructTemplateBuilder::new(COIN)
            .phantom_param()
            .field("id", uid())
            .field(
                "balance",
                TemplateType::datatype(BALANCE, vec![TemplateType::param(0)]),
            )
            .build()?,
        StructTemplateBuilder::new(SUI)
            .field("dummy_field", TemplateType::bool())
            .build()?,
        StructTemplateBuilder::new(DYNAMIC_FIELD)
            .type_param()
            .type_param()
            .field("id", uid())
            .field("name", TemplateType::param(0))
            .field("value", TemplateType::param(1))
            .build()?,
    ])
}
