// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Plain export and reconstruction.
//!
//! Tagged export must feed back through `create` (or `revive`) and yield an
//! instance whose untagged export equals the original's.

mod common;

use common::{fixture, fixture_with};
use serde_json::json;
use typemodel::{ModelError, RuntimeConfig, Subtypes, TypedValue};

fn sample_team() -> serde_json::Value {
    json!({
        "lead": {"name": "l", "age": 40},
        "members": {"a": {"name": "a"}, "b": {"name": "b", "age": 2}},
        "roster": [{"name": "r"}, {"name": "s", "age": 7}]
    })
}

#[test]
fn test_tagged_export_shape() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, sample_team()).unwrap();
    let tagged = team.to_json(true);

    assert_eq!(tagged["_type"], "Team");
    assert_eq!(tagged["lead"]["_type"], "User");
    assert_eq!(tagged["members"]["_type"], "Map");
    assert_eq!(tagged["members"]["a"]["_type"], "User");
    assert!(tagged["roster"].is_array());
    assert_eq!(tagged["roster"][1]["_type"], "User");

    let plain = team.to_json(false);
    assert!(plain.get("_type").is_none());
    assert_eq!(plain["members"]["a"], json!({"name": "a", "age": 10}));
    assert_eq!(team.to_js(), plain);
}

#[test]
fn test_create_from_tagged_export() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, sample_team()).unwrap();

    let rebuilt = fx.registry.create(&fx.team, team.to_json(true)).unwrap();
    assert_eq!(rebuilt.to_json(false), team.to_json(false));
    assert_eq!(rebuilt.to_json(true), team.to_json(true));
}

#[test]
fn test_revive_uses_discriminant() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, sample_team()).unwrap();

    let revived = fx.registry.revive(team.to_json(true)).unwrap();
    assert_eq!(revived.type_ref().name(), "Team");
    assert_eq!(revived.to_json(false), team.to_json(false));

    let err = fx.registry.revive(json!({"name": "x"})).unwrap_err();
    assert!(matches!(err, ModelError::MalformedPayload(_)));

    let err = fx.registry.revive(json!({"_type": "Ghost"})).unwrap_err();
    assert_eq!(err, ModelError::UnknownType("Ghost".to_string()));
}

#[test]
fn test_polymorphic_map_round_trip() {
    let fx = fixture();
    let places = fx.registry.map_of(Subtypes::tagged(&[fx.user.clone(), fx.address.clone()]));
    let map = fx
        .registry
        .create(
            &places,
            json!({
                "home": {"_type": "Address", "street": "Main", "number": 3},
                "owner": {"_type": "User", "name": "o"}
            }),
        )
        .unwrap();

    // Both would match `{}` structurally; the tags keep them apart
    let empty_address = fx.registry.create(&fx.address, json!({})).unwrap();
    map.set("blank", &empty_address).unwrap();

    let rebuilt = fx.registry.create(&places, map.to_json(true)).unwrap();
    let blank = rebuilt.get("blank").and_then(TypedValue::into_instance).unwrap();
    assert_eq!(blank.type_ref().name(), "Address");
    assert_eq!(rebuilt.to_json(false), map.to_json(false));
}

#[test]
fn test_union_sharing_one_tag_round_trip() {
    let fx = fixture();
    let numbers = fx.registry.map_of(&fx.registry.number());
    let strings = fx.registry.map_of(&fx.registry.string());
    let grids = fx.registry.list_of([numbers, strings]);
    assert_eq!(grids.to_string(), "List<Map<Number>|Map<String>>");

    let list = fx
        .registry
        .create(&grids, json!([{"h": "s"}, {"n": 1}]))
        .unwrap();

    // Both members export the same "Map" tag; the payload picks between them
    let tagged = list.to_json(true);
    assert_eq!(tagged[0]["_type"], "Map");
    assert_eq!(tagged[1]["_type"], "Map");

    let rebuilt = fx.registry.create(&grids, tagged).unwrap();
    let kind = |index: usize| {
        rebuilt
            .at(index)
            .and_then(TypedValue::into_instance)
            .map(|i| i.type_name())
    };
    assert_eq!(kind(0).as_deref(), Some("Map<String>"));
    assert_eq!(kind(1).as_deref(), Some("Map<Number>"));
    assert_eq!(rebuilt.to_json(false), list.to_json(false));

    // A tagged entry no candidate accepts still fails
    let err = fx
        .registry
        .create(&grids, json!([{"_type": "Map", "h": true}]))
        .unwrap_err();
    assert_eq!(err.diagnostic().unwrap().path, "List<Map<Number>|Map<String>>[0]");
}

#[test]
fn test_self_referencing_chain() {
    let fx = fixture();
    let chain = fx
        .registry
        .create(
            &fx.node,
            json!({"label": "a", "next": {"label": "b", "next": {"label": "c"}}}),
        )
        .unwrap();

    let exported = chain.to_json(true);
    assert_eq!(exported["next"]["next"]["next"], serde_json::Value::Null);
    assert_eq!(exported["next"]["_type"], "Node");

    let rebuilt = fx.registry.revive(exported).unwrap();
    assert_eq!(rebuilt.to_json(false), chain.to_json(false));
}

#[test]
fn test_custom_tag_key() {
    let fx = fixture_with(RuntimeConfig::default().with_tag_key("kind"));
    let user = fx.registry.create(&fx.user, json!({"name": "k"})).unwrap();

    let tagged = user.to_json(true);
    assert_eq!(tagged["kind"], "User");
    assert!(tagged.get("_type").is_none());

    let revived = fx.registry.revive(tagged).unwrap();
    assert_eq!(revived.to_json(false), user.to_json(false));
}

#[test]
fn test_serialize_matches_untagged_export() {
    let fx = fixture();
    let team = fx.registry.create(&fx.team, sample_team()).unwrap();

    let via_serde = serde_json::to_value(&team).unwrap();
    assert_eq!(via_serde, team.to_json(false));

    let lead = team.get("lead").unwrap();
    assert_eq!(serde_json::to_string(&lead).unwrap(), r#"{"name":"l","age":40}"#);
    assert_eq!(lead.to_json(false), via_serde["lead"]);
}

#[test]
fn test_default_instance() {
    let fx = fixture();
    let team = fx.registry.default_instance(&fx.team).unwrap();
    assert_eq!(
        team.to_json(false),
        json!({"lead": {"name": "", "age": 10}, "members": {}, "roster": []})
    );
    assert_eq!(fx.registry.defaults(&fx.node), json!({"label": "", "next": null}));
}
