// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! List container: index access, validation and family checks.

mod common;

use common::fixture;
use serde_json::json;
use typemodel::{DiagnosticKind, ModelError, TypedValue};

#[test]
fn test_list_of_numbers() {
    let fx = fixture();
    let numbers = fx.registry.list_of(&fx.registry.number());
    let list = fx.registry.create(&numbers, json!([1, 2, 3])).unwrap();

    assert_eq!(list.type_name(), "List<Number>");
    assert_eq!(list.at(1).unwrap().as_i64(), Some(2));
    assert!(list.at(3).is_none());
    assert_eq!(list.keys(), ["0", "1", "2"]);

    // 1. Append and replace
    assert_eq!(list.push(4).unwrap(), 4);
    list.set_at(0, 10).unwrap();
    assert_eq!(list.to_json(false), json!([10, 2, 3, 4]));

    // 2. Bounds and validation
    match list.set_at(9, 1) {
        Err(ModelError::IndexOutOfBounds { index, len }) => {
            assert_eq!((index, len), (9, 4));
        }
        other => panic!("expected out of bounds, got {:?}", other),
    }
    let err = list.set_at(0, "x").unwrap_err();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.kind, DiagnosticKind::TypeMismatch);
    assert_eq!(diag.path, "List<Number>[0]");
    assert_eq!(diag.entry_point, "List set error");
    assert!(list.push(true).is_err());
    assert_eq!(list.len(), 4);

    // 3. Removal
    assert_eq!(list.pop(), Some(TypedValue::from(json!(4))));
    assert_eq!(list.remove_at(0), Some(TypedValue::from(json!(10))));
    assert!(list.remove_at(7).is_none());
    assert_eq!(list.to_json(false), json!([2, 3]));

    list.clear();
    assert!(list.is_empty());
    assert!(list.pop().is_none());
}

#[test]
fn test_list_of_records_keeps_instances() {
    let fx = fixture();
    let users = fx.registry.list_of(&fx.user);
    let list = fx.registry.create(&users, json!([{"name": "a"}])).unwrap();

    let first = list.at(0).and_then(TypedValue::into_instance).unwrap();
    assert_eq!(first.to_json(false), json!({"name": "a", "age": 10}));

    let existing = fx.registry.create(&fx.user, json!({"name": "b"})).unwrap();
    list.push(&existing).unwrap();
    assert!(list.at(1).unwrap().as_instance().unwrap().ptr_eq(&existing));

    let err = list.push(json!({"name": 1})).unwrap_err();
    assert_eq!(err.diagnostic().unwrap().path, "List<User>[2]");
}

#[test]
fn test_nested_generics() {
    let fx = fixture();
    let grid = fx
        .registry
        .list_of(&fx.registry.map_of(&fx.registry.number()));
    assert_eq!(grid.to_string(), "List<Map<Number>>");

    let list = fx
        .registry
        .create(&grid, json!([{"a": 1}, {"b": 2, "c": 3}]))
        .unwrap();
    let second = list.at(1).and_then(TypedValue::into_instance).unwrap();
    assert_eq!(second.type_name(), "Map<Number>");
    assert_eq!(second.len(), 2);

    let err = fx
        .registry
        .create(&grid, json!([{"a": 1}, {"b": "x"}]))
        .unwrap_err();
    assert_eq!(err.diagnostic().unwrap().path, "List<Map<Number>>[1]");
}

#[test]
fn test_operations_checked_against_family() {
    let fx = fixture();
    let numbers = fx.registry.map_of(&fx.registry.number());
    let map = fx.registry.create(&numbers, json!({"a": 1})).unwrap();
    let list = fx
        .registry
        .create(&fx.registry.list_of(&fx.registry.number()), json!([1]))
        .unwrap();

    assert!(matches!(map.push(1), Err(ModelError::InvalidOperation { .. })));
    assert!(map.at(0).is_none());
    assert!(matches!(
        list.set("a", 1),
        Err(ModelError::InvalidOperation { .. })
    ));
    assert!(!list.delete("0"));
    assert!(!list.has("0"));

    let err = fx.registry.create(&fx.registry.list_of(&fx.user), json!({"a": {}})).unwrap_err();
    assert!(matches!(err, ModelError::MalformedPayload(_)));
}

#[test]
fn test_list_from_another_list() {
    let fx = fixture();
    let numbers = fx.registry.list_of(&fx.registry.number());
    let source = fx.registry.create(&numbers, json!([5, 6])).unwrap();
    let copy = fx.registry.create(&numbers, &source).unwrap();

    assert!(!copy.ptr_eq(&source));
    copy.push(7).unwrap();
    assert_eq!(source.len(), 2);
    assert_eq!(copy.to_json(false), json!([5, 6, 7]));
}
