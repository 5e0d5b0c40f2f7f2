// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! BCS codec tests against instantiated framework and custom types.

use super::*;
use crate::config::WrapperForm;
use crate::decode::DecodeOptions;
use crate::error::ReifyError;
use crate::types::{
    instantiate, normalize_type_name, DatatypeTemplate, EnumTemplateBuilder, PrimitiveKind,
    TemplateType, TypeDescriptor,
};
use crate::value::{MoveValue, VariantPayload};
use crate::well_known::{self, framework_templates};
use std::collections::HashMap;
use std::sync::Arc;

const ADDR_BYTE: u8 = 0xab;

fn templates() -> HashMap<String, Arc<DatatypeTemplate>> {
    let shape = EnumTemplateBuilder::new("0x1::shape::Shape")
        .unit_variant("Empty")
        .named_variant("Circle", [("radius", TemplateType::u64())])
        .positional_variant("Rect", [TemplateType::u32(), TemplateType::u32()])
        .build()
        .unwrap();
    framework_templates()
        .unwrap()
        .into_iter()
        .chain(std::iter::once(shape))
        .map(|t| (t.name.clone(), Arc::new(t)))
        .collect()
}

fn instance(
    templates: &HashMap<String, Arc<DatatypeTemplate>>,
    name: &str,
    args: &[TypeDescriptor],
) -> TypeDescriptor {
    let key = normalize_type_name(name).unwrap();
    instantiate(&templates[&key], args, templates).unwrap()
}

fn coin_sui() -> TypeDescriptor {
    let t = templates();
    let sui = instance(&t, well_known::SUI, &[]);
    instance(&t, well_known::COIN, &[sui])
}

fn coin_bytes(amount: u64) -> Vec<u8> {
    let mut bytes = vec![ADDR_BYTE; 32];
    bytes.extend(amount.to_le_bytes());
    bytes
}

#[test]
fn test_coin_decode_full_and_plain() {
    let schema = build_schema(&coin_sui()).unwrap();
    let bytes = coin_bytes(1_000);

    let full = decode_bcs(&schema, &bytes, &DecodeOptions::default()).unwrap();
    let id = full.field("id").and_then(MoveValue::as_str).unwrap();
    assert_eq!(id, format!("0x{}", "ab".repeat(32)));
    let balance = full.field("balance").unwrap();
    assert_eq!(balance.field("value").and_then(MoveValue::as_u64), Some(1_000));
    assert!(balance
        .as_struct()
        .unwrap()
        .type_name
        .ends_with("::balance::Balance<0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI>"));

    let plain = DecodeOptions::default().with_wrapper_form(WrapperForm::Plain);
    let decoded = decode_bcs(&schema, &bytes, &plain).unwrap();
    assert_eq!(decoded.field("balance"), Some(&MoveValue::U64(1_000)));
}

#[test]
fn test_coin_width_ignores_phantom() {
    let schema = build_schema(&coin_sui()).unwrap();
    assert_eq!(schema.fixed_size(), Some(32 + 8));
}

#[test]
fn test_enum_dispatch_by_index() {
    let t = templates();
    let schema = build_schema(&instance(&t, "0x1::shape::Shape", &[])).unwrap();
    let options = DecodeOptions::default();

    let empty = decode_bcs(&schema, &[0], &options).unwrap();
    assert_eq!(empty.variant_name(), Some("Empty"));

    let mut circle = vec![1];
    circle.extend(7u64.to_le_bytes());
    let decoded = decode_bcs(&schema, &circle, &options).unwrap();
    let variant = decoded.as_variant().unwrap();
    assert_eq!(variant.variant, "Circle");
    assert_eq!(variant.index, 1);
    assert_eq!(
        variant.payload,
        VariantPayload::Named(vec![("radius".into(), MoveValue::U64(7))])
    );

    let mut rect = vec![2];
    rect.extend(3u32.to_le_bytes());
    rect.extend(4u32.to_le_bytes());
    let decoded = decode_bcs(&schema, &rect, &options).unwrap();
    assert_eq!(
        decoded.as_variant().unwrap().payload,
        VariantPayload::Positional(vec![MoveValue::U32(3), MoveValue::U32(4)])
    );
    assert_eq!(encode_bcs(&schema, &decoded).unwrap(), rect);

    match decode_bcs(&schema, &[3], &options) {
        Err(ReifyError::UnknownVariant { variant, .. }) => assert_eq!(variant, "3"),
        other => panic!("expected UnknownVariant, got {:?}", other),
    }
}

#[test]
fn test_option_string_host_forms() {
    let t = templates();
    let string = instance(&t, well_known::UTF8_STRING, &[]);
    let schema = build_schema(&instance(&t, well_known::OPTION, &[string])).unwrap();
    let options = DecodeOptions::default();

    let some = decode_bcs(&schema, &[1, 2, b'h', b'i'], &options).unwrap();
    assert_eq!(
        some,
        MoveValue::Option(Some(Box::new(MoveValue::String("hi".into()))))
    );
    assert_eq!(decode_bcs(&schema, &[0], &options).unwrap(), MoveValue::Option(None));
    assert_eq!(encode_bcs(&schema, &some).unwrap(), [1, 2, b'h', b'i']);

    // An option carries at most one element.
    assert!(matches!(
        decode_bcs(&schema, &[2, 1, b'a', 1, b'b'], &options),
        Err(ReifyError::MalformedBinary(_))
    ));
}

#[test]
fn test_coin_round_trip() {
    let schema = build_schema(&coin_sui()).unwrap();
    let bytes = coin_bytes(u64::MAX);
    let value = decode_bcs(&schema, &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(encode_bcs(&schema, &value).unwrap(), bytes);

    let plain = DecodeOptions::default().with_wrapper_form(WrapperForm::Plain);
    let value = decode_bcs(&schema, &bytes, &plain).unwrap();
    assert_eq!(encode_bcs(&schema, &value).unwrap(), bytes);
}

#[test]
fn test_malformed_binary() {
    let options = DecodeOptions::default();
    let bool_schema = BinarySchema::Primitive(PrimitiveKind::Bool);
    let bytes_schema = BinarySchema::Vector(Arc::new(BinarySchema::Primitive(PrimitiveKind::U8)));
    let t = templates();
    let string_schema = build_schema(&instance(&t, well_known::UTF8_STRING, &[])).unwrap();

    let cases: Vec<(&BinarySchema, &[u8])> = vec![
        (&bool_schema, &[2][..]),
        (&bool_schema, &b""[..]),
        (&bool_schema, &[1, 0][..]),
        (&bytes_schema, &[3, 1, 2][..]),
        (&bytes_schema, &[0x80, 0x00][..]),
        (&string_schema, &[1, 0xff][..]),
    ];
    for (schema, bytes) in cases {
        assert!(
            matches!(decode_bcs(schema, bytes, &options), Err(ReifyError::MalformedBinary(_))),
            "{:?} should be rejected",
            bytes
        );
    }
}

#[test]
fn test_depth_limit() {
    let u8_vec = BinarySchema::Vector(Arc::new(BinarySchema::Primitive(PrimitiveKind::U8)));
    let nested = BinarySchema::Vector(Arc::new(BinarySchema::Vector(Arc::new(u8_vec))));
    let shallow = DecodeOptions {
        max_depth: 2,
        ..DecodeOptions::default()
    };
    assert!(decode_bcs(&nested, &[1, 1, 1, 5], &DecodeOptions::default()).is_ok());
    assert!(matches!(
        decode_bcs(&nested, &[1, 1, 1, 5], &shallow),
        Err(ReifyError::MalformedBinary(_))
    ));
}

#[test]
fn test_encode_rejects_wrong_type_name() {
    let t = templates();
    let schema = build_schema(&instance(&t, well_known::TYPE_NAME, &[])).unwrap();
    let mut value = decode_bcs(&schema, &[1, b'x'], &DecodeOptions::default()).unwrap();
    if let MoveValue::Struct(s) = &mut value {
        s.type_name = "0x1::other::TypeName".into();
    }
    assert!(matches!(
        encode_bcs(&schema, &value),
        Err(ReifyError::TypeMismatch { .. })
    ));
}

#[test]
fn test_garbage_input_never_panics() {
    let schema = build_schema(&coin_sui()).unwrap();
    let t = templates();
    let shape = build_schema(&instance(&t, "0x1::shape::Shape", &[])).unwrap();
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let options = DecodeOptions::default();

    for _ in 0..500 {
        let len = rng.usize(0..64);
        let bytes: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
        if let Ok(value) = decode_bcs(&schema, &bytes, &options) {
            assert_eq!(encode_bcs(&schema, &value).unwrap(), bytes);
        }
        if let Ok(value) = decode_bcs(&shape, &bytes, &options) {
            assert_eq!(encode_bcs(&shape, &value).unwrap(), bytes);
        }
    }
}
