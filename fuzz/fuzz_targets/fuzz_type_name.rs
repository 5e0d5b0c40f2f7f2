// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use move_reify::{normalize_type_name, parse_type_name, types_equal};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_type_name(input);

    // Normalization is idempotent.
    if let Ok(normalized) = normalize_type_name(input) {
        assert_eq!(normalize_type_name(&normalized).ok().as_deref(), Some(normalized.as_str()));
        assert!(types_equal(input, &normalized));
    }
});
