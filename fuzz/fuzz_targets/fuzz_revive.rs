// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use typemodel::{SilentSink, TypeRegistry};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let mut builder = TypeRegistry::builder().with_sink(Arc::new(SilentSink));
    let string = builder.string();
    let _ = builder.define("Node", |this| {
        vec![("label", string.clone()), ("next", this.nullable())]
    });
    let registry = builder.build();

    if let Ok(instance) = registry.revive(value) {
        let _ = instance.set_value_deep(instance.to_json(true));
        let _ = instance.is_invalidated();
    }
});
