// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity

//! Read-only projections.
//!
//! A projection shares its source's payload, is created once per source,
//! ignores every mutator and hands out projected nested instances.

mod common;

use common::fixture;
use serde_json::json;
use typemodel::TypedValue;

#[test]
fn test_projection_is_stable() {
    let fx = fixture();
    let user = fx.registry.create(&fx.user, json!({"name": "x"})).unwrap();

    let view = user.as_read_only();
    assert!(view.is_read_only());
    assert!(!user.is_read_only());
    assert!(view.ptr_eq(&user.as_read_only()));
    assert!(view.ptr_eq(&view.as_read_only()));
    assert!(view.shares_payload(&user));
    assert_ne!(view, user);

    let created = fx
        .registry
        .create_read_only(&fx.user, json!({"name": "y"}))
        .unwrap();
    assert!(created.is_read_only());
    assert_eq!(created.get("name").unwrap().as_str(), Some("y"));
}

#[test]
fn test_mutators_are_silent_noops() {
    let fx = fixture();
    let numbers = fx.registry.map_of(&fx.registry.number());
    let map = fx.registry.create(&numbers, json!({"a": 1})).unwrap();
    let view = map.as_read_only();

    // Even a value that would fail validation is ignored without a report
    view.set("b", 2).expect("set on view");
    view.set("c", "not a number").expect("set on view");
    assert!(!view.delete("a"));
    view.clear();
    assert!(!view.set_value(json!({})).unwrap());
    assert!(!view.set_value_deep(json!({"z": 9})).unwrap());

    assert_eq!(map.to_json(false), json!({"a": 1}));
    assert!(!map.is_invalidated());
    assert!(fx.collector.is_empty());

    let list = fx
        .registry
        .create_read_only(&fx.registry.list_of(&fx.registry.number()), json!([1, 2]))
        .unwrap();
    assert_eq!(list.push(3).unwrap(), 2);
    assert!(list.pop().is_none());
    assert!(list.remove_at(0).is_none());
    list.set_at(0, 7).unwrap();
    assert_eq!(list.to_json(false), json!([1, 2]));
}

#[test]
fn test_source_mutations_show_through() {
    let fx = fixture();
    let user = fx.registry.create(&fx.user, json!({"name": "x"})).unwrap();
    let view = user.as_read_only();

    user.set("name", "changed").unwrap();
    assert_eq!(view.get("name").unwrap().as_str(), Some("changed"));
    assert!(view.is_invalidated());

    view.revalidate();
    assert!(!user.is_invalidated());
}

#[test]
fn test_nested_accessors_project() {
    let fx = fixture();
    let team = fx
        .registry
        .create(
            &fx.team,
            json!({
                "lead": {"name": "l"},
                "members": {"a": {"name": "a"}},
                "roster": [{"name": "r"}]
            }),
        )
        .unwrap();
    let view = team.as_read_only();

    let lead = view.get("lead").and_then(TypedValue::into_instance).unwrap();
    assert!(lead.is_read_only());
    let source_lead = team.get("lead").and_then(TypedValue::into_instance).unwrap();
    assert!(!source_lead.is_read_only());
    assert!(lead.shares_payload(&source_lead));
    assert!(lead.ptr_eq(&source_lead.as_read_only()));

    lead.set("name", "ignored").unwrap();
    assert_eq!(source_lead.get("name").unwrap().as_str(), Some("l"));

    let members = view.get("members").and_then(TypedValue::into_instance).unwrap();
    assert!(members.is_read_only());
    let member = members.get("a").and_then(TypedValue::into_instance).unwrap();
    assert!(member.is_read_only());

    let roster = view.get("roster").and_then(TypedValue::into_instance).unwrap();
    assert!(roster.at(0).unwrap().as_instance().unwrap().is_read_only());

    for value in view.values() {
        assert!(value.as_instance().map_or(true, |i| i.is_read_only()));
    }
    for (_, value) in members.entries() {
        assert!(value.as_instance().unwrap().is_read_only());
    }
    view.for_each(|value, _| {
        assert!(value.as_instance().unwrap().is_read_only());
    });
}

#[test]
fn test_projection_stored_as_entry_keeps_identity() {
    let fx = fixture();
    let users = fx.registry.map_of(&fx.user);
    let map = fx.registry.create(&users, json!({})).unwrap();
    let frozen = fx
        .registry
        .create_read_only(&fx.user, json!({"name": "f"}))
        .unwrap();

    map.set("f", &frozen).unwrap();
    let stored = map.get("f").and_then(TypedValue::into_instance).unwrap();
    assert!(stored.ptr_eq(&frozen));
    assert!(stored.is_read_only());

    // Writes through the stored view stay no-ops
    stored.set("name", "g").unwrap();
    assert_eq!(frozen.get("name").unwrap().as_str(), Some("f"));
}
