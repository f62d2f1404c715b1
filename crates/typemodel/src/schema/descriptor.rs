// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registered type descriptors.

use super::type_ref::TypeRef;
use crate::value::TypedValue;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Index of a descriptor inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Leaf scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }

    pub fn default_value(self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::from(0),
            Self::Boolean => Value::Bool(false),
        }
    }
}

/// Built-in generic containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericKind {
    /// String-keyed mapping.
    Map,
    /// Ordered sequence.
    List,
}

impl GenericKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::List => "List",
        }
    }

    pub(crate) fn noun(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::List => "list",
        }
    }
}

/// Coarse classification carried by every [`TypeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Scalar(ScalarKind),
    Record,
    Generic(GenericKind),
}

/// A named record field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Scalar(ScalarKind),
    Record(Vec<FieldDescriptor>),
    Generic(GenericKind),
}

pub type TestFn = Arc<dyn Fn(&TypedValue) -> bool + Send + Sync>;
pub type DefaultsFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Capability overrides supplied at registration.
///
/// Anything left unset is generated from the descriptor's shape.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub(crate) test: Option<TestFn>,
    pub(crate) defaults: Option<DefaultsFn>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&TypedValue) -> bool + Send + Sync + 'static,
    {
        self.test = Some(Arc::new(test));
        self
    }

    pub fn with_defaults<F>(mut self, defaults: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.defaults = Some(Arc::new(defaults));
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("test", &self.test.as_ref().map(|_| "custom"))
            .field("defaults", &self.defaults.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// A registered type. Immutable once the registry is built.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) kind: TypeKind,
    pub(crate) capabilities: Capabilities,
}

impl TypeDescriptor {
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity written under the discriminant key.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn family(&self) -> TypeFamily {
        match &self.kind {
            TypeKind::Scalar(kind) => TypeFamily::Scalar(*kind),
            TypeKind::Record(_) => TypeFamily::Record,
            TypeKind::Generic(kind) => TypeFamily::Generic(*kind),
        }
    }

    /// Declared fields; empty for scalars and generics.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            TypeKind::Record(fields) => fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn has_custom_test(&self) -> bool {
        self.capabilities.test.is_some()
    }

    pub fn has_custom_defaults(&self) -> bool {
        self.capabilities.defaults.is_some()
    }

    /// Plain reference to this descriptor, without options.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.id, self.family(), &self.name, &self.tag)
    }
}
