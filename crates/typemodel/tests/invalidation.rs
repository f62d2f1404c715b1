// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::cast_possible_truncation)] // Test parameters

//! Change invalidation across nested instances.

mod common;

use common::{fixture, fixture_with};
use serde_json::json;
use typemodel::{InvalidationMode, RuntimeConfig, TypedInstance, TypedValue};

fn child(parent: &TypedInstance, key: &str) -> TypedInstance {
    parent
        .get(key)
        .and_then(TypedValue::into_instance)
        .unwrap_or_else(|| panic!("no instance under {}", key))
}

fn team_input() -> serde_json::Value {
    json!({
        "lead": {"name": "l"},
        "members": {"a": {"name": "a"}, "b": {"name": "b"}},
        "roster": [{"name": "r"}]
    })
}

#[test]
fn test_fresh_instance_is_clean() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, team_input()).unwrap();
    assert!(!team.is_invalidated());
    assert!(!child(&team, "lead").is_invalidated());
}

#[test]
fn test_change_propagates_to_ancestors_only() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, team_input()).unwrap();
    let lead = child(&team, "lead");
    let members = child(&team, "members");
    let roster = child(&team, "roster");
    let a = child(&members, "a");
    let b = child(&members, "b");

    // 1. Mutate a leaf two levels down
    a.set("age", 33).unwrap();
    assert!(a.is_invalidated());
    assert!(members.is_invalidated());
    assert!(team.is_invalidated());

    // 2. Siblings and unrelated branches stay clean
    assert!(!b.is_invalidated());
    assert!(!lead.is_invalidated());
    assert!(!roster.is_invalidated());

    // 3. Revalidate clears the whole subtree
    team.revalidate();
    for instance in [&team, &lead, &members, &roster, &a, &b] {
        assert!(!instance.is_invalidated());
    }

    // 4. A later change is seen again
    roster.push(json!({"name": "s"})).unwrap();
    assert!(roster.is_invalidated());
    assert!(team.is_invalidated());
    assert!(!members.is_invalidated());
}

#[test]
fn test_shared_child_invalidates_every_parent() {
    let fx = fixture();
    let users = fx.registry.map_of(&fx.user);
    let shared = fx.registry.create(&fx.user, json!({"name": "s"})).unwrap();
    let left = fx.registry.create(&users, json!({})).unwrap();
    let right = fx.registry.create(&users, json!({})).unwrap();
    left.set("s", &shared).unwrap();
    right.set("s", &shared).unwrap();
    left.revalidate();
    right.revalidate();

    shared.set("age", 1).unwrap();
    assert!(left.is_invalidated());
    assert!(right.is_invalidated());
}

#[test]
fn test_unchanged_writes_do_not_invalidate() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, team_input()).unwrap();

    assert!(!team.set_value_deep(team.to_json(false)).unwrap());
    assert!(!team.is_invalidated());

    let members = child(&team, "members");
    assert!(!members.delete("missing"));
    assert!(!team.is_invalidated());
}

#[test]
fn test_latched_answer_until_reset() {
    let fx = fixture_with(RuntimeConfig::default().with_invalidation(InvalidationMode::Latched));
    let team = fx.registry.create(&fx.team, team_input()).unwrap();
    let lead = child(&team, "lead");

    assert!(!team.is_invalidated());
    lead.set("name", "changed").unwrap();
    assert!(!team.is_invalidated());

    team.reset_validation_check();
    assert!(team.is_invalidated());

    team.revalidate();
    assert!(!team.is_invalidated());
}

#[test]
fn test_live_mode_sees_change_without_reset() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, team_input()).unwrap();
    let lead = child(&team, "lead");

    assert!(!team.is_invalidated());
    lead.set("name", "changed").unwrap();
    assert!(team.is_invalidated());
}

#[test]
fn test_randomized_mutations_match_expectation() {
    let fx = fixture();
    let users = fx.registry.map_of(&fx.user);
    let mut rng = fastrand::Rng::with_seed(0x7e57_1a7e);

    for round in 0..32 {
        let count = rng.usize(1..12);
        let input: serde_json::Map<String, serde_json::Value> = (0..count)
            .map(|i| (format!("u{:02}", i), json!({"name": format!("n{}", i)})))
            .collect();
        let map = fx.registry.create(&users, serde_json::Value::Object(input)).unwrap();
        map.revalidate();

        let children: Vec<TypedInstance> = map
            .values()
            .into_iter()
            .filter_map(TypedValue::into_instance)
            .collect();
        let touched: Vec<bool> = children.iter().map(|_| rng.bool()).collect();
        for (instance, touch) in children.iter().zip(&touched) {
            if *touch {
                instance.set("age", rng.u32(0..100)).unwrap();
            }
        }

        for (instance, touch) in children.iter().zip(&touched) {
            assert_eq!(instance.is_invalidated(), *touch, "round {}", round);
        }
        assert_eq!(
            map.is_invalidated(),
            touched.iter().any(|t| *t),
            "round {}",
            round
        );
    }
}
