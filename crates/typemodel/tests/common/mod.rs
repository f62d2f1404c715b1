// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared registry fixture for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use typemodel::{DiagnosticCollector, RuntimeConfig, TypeRef, TypeRegistry};

pub struct Fixture {
    pub registry: Arc<TypeRegistry>,
    pub collector: Arc<DiagnosticCollector>,
    /// `User { name: String = "", age: Number = 10 }`
    pub user: TypeRef,
    /// `Address { street: String, number: Number }`
    pub address: TypeRef,
    /// `Node { label: String, next: Node? }`
    pub node: TypeRef,
    /// `Team { lead: User, members: Map<User>, roster: List<User> }`
    pub team: TypeRef,
}

pub fn fixture() -> Fixture {
    fixture_with(RuntimeConfig::default())
}

pub fn fixture_with(config: RuntimeConfig) -> Fixture {
    let collector = Arc::new(DiagnosticCollector::new());
    let mut builder = TypeRegistry::builder()
        .with_config(config)
        .with_sink(collector.clone());

    let string = builder.string();
    let number = builder.number();

    let user = builder
        .define("User", |_| {
            vec![
                ("name", string.with_default("")),
                ("age", number.with_default(10)),
            ]
        })
        .expect("define User");
    let address = builder
        .define("Address", |_| {
            vec![("street", string.clone()), ("number", number.clone())]
        })
        .expect("define Address");
    let node = builder
        .define("Node", |this| {
            vec![("label", string.clone()), ("next", this.nullable())]
        })
        .expect("define Node");
    let members = builder.map_of(&user);
    let roster = builder.list_of(&user);
    let team = builder
        .define("Team", |_| {
            vec![
                ("lead", user.clone()),
                ("members", members),
                ("roster", roster),
            ]
        })
        .expect("define Team");

    Fixture {
        registry: builder.build(),
        collector,
        user,
        address,
        node,
        team,
    }
}
