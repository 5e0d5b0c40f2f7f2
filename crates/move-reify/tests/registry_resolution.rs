// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Registry resolution: arity checks over every framework template, recursive
// argument resolution, phantom exclusion and the process-wide registry.

use move_reify::well_known::{self, framework_templates};
use move_reify::{
    compose_type_name, global_registry, parse_type_name, BinarySchema, MoveValue, ReifyError,
    TypeRegistry,
};

#[test]
fn test_arity_over_framework_templates() {
    let registry = TypeRegistry::with_framework().unwrap();
    for template in framework_templates().unwrap() {
        let n = template.num_type_params();

        let exact = vec!["u8"; n];
        let name = compose_type_name(&template.name, &exact);
        assert!(registry.resolve(&name).is_ok(), "{} should resolve", name);

        let extra = vec!["u8"; n + 1];
        match registry.resolve(&compose_type_name(&template.name, &extra)) {
            Err(ReifyError::TypeArgumentCountMismatch { expected, found, .. }) => {
                assert_eq!((expected, found), (n, n + 1));
            }
            other => panic!("{}: expected arity error, got {:?}", template.name, other),
        }
    }
}

#[test]
fn test_nested_generic_parsing() {
    let parsed = parse_type_name(
        "0x2::dynamic_field::Field<0x1::string::String, 0x2::coin::Coin<0x2::sui::SUI>>",
    )
    .unwrap();
    assert_eq!(parsed.name, "Field");
    assert_eq!(
        parsed.type_args,
        vec!["0x1::string::String", "0x2::coin::Coin<0x2::sui::SUI>"]
    );

    let registry = TypeRegistry::with_framework().unwrap();
    let bundle = registry
        .resolve("0x2::dynamic_field::Field<0x1::string::String, 0x2::coin::Coin<0x2::sui::SUI>>")
        .unwrap();
    assert_eq!(
        bundle.type_name(),
        format!(
            "{}<{}, {}<{}>>",
            well_known::DYNAMIC_FIELD,
            well_known::UTF8_STRING,
            well_known::COIN,
            well_known::SUI
        )
    );
}

#[test]
fn test_recursive_resolution_and_unknown_types() {
    let registry = TypeRegistry::with_framework().unwrap();
    assert!(registry
        .resolve_type("vector<0x1::option::Option<0x2::balance::Balance<0x2::sui::SUI>>>")
        .is_ok());

    for unknown in [
        "0x9::missing::Missing",
        "0x1::option::Option<0x9::missing::Missing>",
        "vector<0x2::coin::Coin<0x9::missing::Missing>>",
    ] {
        assert!(
            matches!(registry.resolve(unknown), Err(ReifyError::UnknownType(_))),
            "{} should be unknown",
            unknown
        );
    }

    assert!(matches!(
        registry.resolve("0x2::coin::Coin<"),
        Err(ReifyError::MalformedTypeString { .. })
    ));
}

#[test]
fn test_phantom_excluded_from_layout() {
    let registry = TypeRegistry::with_framework().unwrap();
    let a = registry.resolve("0x2::balance::Balance<0x2::sui::SUI>").unwrap();
    let b = registry
        .resolve("0x2::balance::Balance<vector<0x1::string::String>>")
        .unwrap();

    let (BinarySchema::Struct(la), BinarySchema::Struct(lb)) = (&**a.schema(), &**b.schema()) else {
        panic!("expected struct layouts");
    };
    assert_eq!(la.fields, lb.fields);
    assert_eq!(a.schema().fixed_size(), Some(8));
    assert_ne!(a.type_name(), b.type_name());

    let bytes = 42u64.to_le_bytes();
    assert_eq!(
        a.decode_bcs(&bytes).unwrap().field("value"),
        b.decode_bcs(&bytes).unwrap().field("value")
    );
}

#[test]
fn test_golden_dynamic_field_bytes() {
    // Field<String, u64> { id: 0x00..01, name: "key", value: 7 }
    let mut bytes = vec![0u8; 31];
    bytes.push(0x01);
    bytes.extend([0x03, b'k', b'e', b'y']);
    bytes.extend([0x07, 0, 0, 0, 0, 0, 0, 0]);

    let registry = TypeRegistry::with_framework().unwrap();
    let value = registry
        .decode_dynamic_field("0x2::dynamic_field::Field<0x1::string::String, u64>", &bytes)
        .unwrap();
    assert_eq!(value.field("name"), Some(&MoveValue::String("key".into())));
    assert_eq!(value.field("value"), Some(&MoveValue::U64(7)));

    let bundle = registry
        .resolve("0x2::dynamic_field::Field<0x1::string::String, u64>")
        .unwrap();
    assert_eq!(bundle.encode_bcs(&value).unwrap(), bytes);
}

#[test]
fn test_global_registry_initializes_once() {
    let first = global_registry().init_once(|r| r.register_framework());
    let second = global_registry().init_once(|r| r.register_framework());
    assert!(first.unwrap());
    assert!(!second.unwrap());
    assert!(global_registry().contains("0x2::coin::Coin"));
}
