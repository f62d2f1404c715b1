// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plain-data export.

use super::instance::{Payload, TypedInstance};
use super::typed::TypedValue;
use crate::schema::{GenericKind, TypeFamily};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

impl TypedInstance {
    /// Recursive plain export.
    ///
    /// With `tagged`, every record and map object carries its type tag under
    /// the registry's discriminant key, so the output can be fed back through
    /// subtype resolution. Lists export as plain arrays either way. An
    /// instance reached again through itself exports as `null`.
    pub fn to_json(&self, tagged: bool) -> Value {
        let tag_key = self.registry().tag_key().to_string();
        self.export(tagged, &tag_key, &mut Vec::new())
    }

    /// Untagged recursive export.
    pub fn to_js(&self) -> Value {
        self.to_json(false)
    }

    fn export(&self, tagged: bool, tag_key: &str, ancestors: &mut Vec<usize>) -> Value {
        let addr = self.core_addr();
        if ancestors.contains(&addr) {
            return Value::Null;
        }
        ancestors.push(addr);
        let exported = match self.snapshot() {
            Payload::Keyed(entries) => {
                let mut object: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), export_value(v, tagged, tag_key, ancestors)))
                    .collect();
                if tagged && self.carries_tag() {
                    object.insert(
                        tag_key.to_string(),
                        Value::String(self.type_ref().tag().to_string()),
                    );
                }
                Value::Object(object)
            }
            Payload::Indexed(items) => Value::Array(
                items
                    .iter()
                    .map(|v| export_value(v, tagged, tag_key, ancestors))
                    .collect(),
            ),
        };
        ancestors.pop();
        exported
    }

    fn carries_tag(&self) -> bool {
        matches!(
            self.family(),
            TypeFamily::Record | TypeFamily::Generic(GenericKind::Map)
        )
    }
}

impl TypedValue {
    pub fn to_json(&self, tagged: bool) -> Value {
        match self {
            Self::Scalar(raw) => raw.clone(),
            Self::Instance(instance) => instance.to_json(tagged),
        }
    }
}

fn export_value(value: &TypedValue, tagged: bool, tag_key: &str, ancestors: &mut Vec<usize>) -> Value {
    match value {
        TypedValue::Scalar(raw) => raw.clone(),
        TypedValue::Instance(instance) => instance.export(tagged, tag_key, ancestors),
    }
}

impl Serialize for TypedInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json(false).serialize(serializer)
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(raw) => raw.serialize(serializer),
            Self::Instance(instance) => instance.serialize(serializer),
        }
    }
}
