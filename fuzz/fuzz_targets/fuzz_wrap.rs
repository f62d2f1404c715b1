// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};
use typemodel::{SilentSink, TypeRef, TypeRegistry};

struct Types {
    registry: Arc<TypeRegistry>,
    targets: Vec<TypeRef>,
}

fn types() -> &'static Types {
    static TYPES: OnceLock<Types> = OnceLock::new();
    TYPES.get_or_init(|| {
        let mut builder = TypeRegistry::builder().with_sink(Arc::new(SilentSink));
        let (string, number) = (builder.string(), builder.number());
        let user = builder
            .define("User", |_| {
                vec![("name", string.with_default("")), ("age", number.with_default(10))]
            })
            .unwrap();
        let node = builder
            .define("Node", |this| vec![("label", string.clone()), ("next", this.nullable())])
            .unwrap();
        let targets = vec![
            user.clone(),
            node,
            builder.map_of(&user),
            builder.list_of(&builder.map_of(&number)),
            builder.map_of([user, builder.boolean()]),
        ];
        Types {
            registry: builder.build(),
            targets,
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let types = types();

    for ty in &types.targets {
        // Strict and lenient construction must agree on success
        let strict = types.registry.create(ty, value.clone());
        let lenient = types.registry.create_lenient(ty, value.clone());
        if let Ok(instance) = strict {
            let rebuilt = types
                .registry
                .create(ty, instance.to_json(true))
                .expect("tagged export must rebuild");
            assert_eq!(rebuilt.to_json(false), instance.to_json(false));
            assert!(lenient.is_ok());
        }
    }
});
