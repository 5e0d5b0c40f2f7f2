// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use move_reify::TypeRegistry;
use std::sync::OnceLock;

const TARGET_TYPES: &[&str] = &[
    "0x2::coin::Coin<0x2::sui::SUI>",
    "0x1::option::Option<vector<0x1::string::String>>",
    "0x2::dynamic_field::Field<0x1::ascii::String, vector<u128>>",
];

fn registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| TypeRegistry::with_framework().expect("framework templates"))
}

fuzz_target!(|data: &[u8]| {
    for type_name in TARGET_TYPES {
        let bundle = registry().resolve(type_name).expect("framework type");
        // Accepted input must re-encode to the same bytes.
        if let Ok(value) = bundle.decode_bcs(data) {
            let encoded = bundle.encode_bcs(&value).expect("re-encode");
            assert_eq!(encoded, data);
        }
    }
});
