// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw input accepted by the wrap pipeline.

use super::instance::TypedInstance;
use super::typed::TypedValue;
use serde_json::Value;

/// Anything a typed value can be built from.
///
/// Three shapes are understood: an existing [`TypedInstance`], a sequence of
/// `[key, value]` pairs (or plain elements for lists), and a structural
/// object. `Plain` JSON is interpreted by shape.
#[derive(Debug, Clone)]
pub enum Input {
    Plain(Value),
    Typed(TypedInstance),
    List(Vec<Input>),
    Object(Vec<(String, Input)>),
}

/// Structural view of an [`Input`].
pub(crate) enum Shape {
    Null,
    Scalar(Value),
    Typed(TypedInstance),
    List(Vec<Input>),
    Object(Vec<(String, Input)>),
}

impl Input {
    /// Sequence of `[key, value]` pairs.
    pub fn pairs<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Input>,
        V: Into<Input>,
    {
        Self::List(
            entries
                .into_iter()
                .map(|(k, v)| Self::List(vec![k.into(), v.into()]))
                .collect(),
        )
    }

    /// Structural object from string keys.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Input>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<Input>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Plain(Value::Null))
    }

    pub fn as_typed(&self) -> Option<&TypedInstance> {
        match self {
            Self::Typed(instance) => Some(instance),
            _ => None,
        }
    }

    pub(crate) fn shape(&self) -> Shape {
        match self {
            Self::Plain(Value::Null) => Shape::Null,
            Self::Plain(Value::Array(items)) => {
                Shape::List(items.iter().cloned().map(Self::Plain).collect())
            }
            Self::Plain(Value::Object(map)) => Shape::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::Plain(v.clone())))
                    .collect(),
            ),
            Self::Plain(raw) => Shape::Scalar(raw.clone()),
            Self::Typed(instance) => Shape::Typed(instance.clone()),
            Self::List(items) => Shape::List(items.clone()),
            Self::Object(entries) => Shape::Object(entries.clone()),
        }
    }

    /// Discriminant carried by plain structural input.
    pub(crate) fn plain_tag(&self, tag_key: &str) -> Option<String> {
        match self {
            Self::Plain(Value::Object(map)) => map.get(tag_key)?.as_str().map(str::to_string),
            Self::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == tag_key)
                .and_then(|(_, v)| match v {
                    Self::Plain(Value::String(tag)) => Some(tag.clone()),
                    _ => None,
                }),
            _ => None,
        }
    }

    /// Value as a two-element `[key, value]` pair.
    pub(crate) fn as_pair(&self) -> Option<(Input, Input)> {
        match self {
            Self::Plain(Value::Array(items)) if items.len() == 2 => {
                Some((Self::Plain(items[0].clone()), Self::Plain(items[1].clone())))
            }
            Self::List(items) if items.len() == 2 => Some((items[0].clone(), items[1].clone())),
            _ => None,
        }
    }

    /// Equal to a stored value without wrapping: same scalar, or the very
    /// same instance.
    pub(crate) fn is_identical_to(&self, stored: &TypedValue) -> bool {
        match (self, stored) {
            (Self::Plain(raw), TypedValue::Scalar(current)) => raw == current,
            (Self::Typed(instance), TypedValue::Instance(current)) => instance.ptr_eq(current),
            _ => false,
        }
    }

    /// Short rendering for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Plain(raw) => serde_json::to_string(raw).unwrap_or_else(|_| "<json>".to_string()),
            Self::Typed(instance) => format!("instance of {}", instance.type_ref()),
            Self::List(items) => format!("sequence of {} items", items.len()),
            Self::Object(entries) => format!("object with {} keys", entries.len()),
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Plain(value)
    }
}

impl From<&Value> for Input {
    fn from(value: &Value) -> Self {
        Self::Plain(value.clone())
    }
}

impl From<TypedInstance> for Input {
    fn from(instance: TypedInstance) -> Self {
        Self::Typed(instance)
    }
}

impl From<&TypedInstance> for Input {
    fn from(instance: &TypedInstance) -> Self {
        Self::Typed(instance.clone())
    }
}

impl From<TypedValue> for Input {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Scalar(raw) => Self::Plain(raw),
            TypedValue::Instance(instance) => Self::Typed(instance),
        }
    }
}

impl From<&TypedValue> for Input {
    fn from(value: &TypedValue) -> Self {
        value.clone().into()
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Self::Plain(Value::String(s.to_string()))
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Self::Plain(Value::String(s))
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Self::Plain(Value::Bool(b))
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Input {
                fn from(n: $t) -> Self {
                    Self::Plain(Value::from(n))
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, f64);
