// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::instance::TypedInstance;
use serde_json::Value;

/// An entry stored in a typed container: a scalar leaf or a nested instance.
#[derive(Debug, Clone)]
pub enum TypedValue {
    Scalar(Value),
    Instance(TypedInstance),
}

impl TypedValue {
    pub fn null() -> Self {
        Self::Scalar(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(raw) => Some(raw),
            Self::Instance(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Value::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    pub fn as_instance(&self) -> Option<&TypedInstance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Scalar(_) => None,
        }
    }

    pub fn into_instance(self) -> Option<TypedInstance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Scalar(_) => None,
        }
    }

    /// Project nested instances read-only; scalars pass through.
    pub(crate) fn read_only(self) -> Self {
        match self {
            Self::Instance(instance) => Self::Instance(instance.as_read_only()),
            scalar => scalar,
        }
    }
}

/// Scalars compare by value, instances by identity.
impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Value> for TypedValue {
    fn from(raw: Value) -> Self {
        Self::Scalar(raw)
    }
}

impl From<TypedInstance> for TypedValue {
    fn from(instance: TypedInstance) -> Self {
        Self::Instance(instance)
    }
}
