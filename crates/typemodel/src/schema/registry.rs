// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry and its builder.
//!
//! Types are registered on a [`RegistryBuilder`]; `build()` freezes them into
//! an `Arc<TypeRegistry>` that every instance created from it keeps alive.

use super::builder::RecordBuilder;
use super::descriptor::{
    Capabilities, FieldDescriptor, GenericKind, ScalarKind, TypeDescriptor, TypeFamily, TypeId,
    TypeKind,
};
use super::subtypes::Subtypes;
use super::type_ref::TypeRef;
use crate::config::RuntimeConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink, Mailbox};
use crate::error::{ModelError, Result};
use crate::value::TypedValue;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Builtins {
    string: TypeRef,
    number: TypeRef,
    boolean: TypeRef,
    map: TypeRef,
    list: TypeRef,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct RegistryBuilder {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    by_tag: HashMap<String, TypeId>,
    builtins: Builtins,
    config: RuntimeConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut types = Vec::new();
        let builtins = Builtins {
            string: push_builtin(&mut types, "String", TypeKind::Scalar(ScalarKind::String)),
            number: push_builtin(&mut types, "Number", TypeKind::Scalar(ScalarKind::Number)),
            boolean: push_builtin(&mut types, "Boolean", TypeKind::Scalar(ScalarKind::Boolean)),
            map: push_builtin(&mut types, "Map", TypeKind::Generic(GenericKind::Map)),
            list: push_builtin(&mut types, "List", TypeKind::Generic(GenericKind::List)),
        };
        let by_name = types.iter().map(|d| (d.name.clone(), d.id)).collect();
        let by_tag = types.iter().map(|d| (d.tag.clone(), d.id)).collect();

        Self {
            types,
            by_name,
            by_tag,
            builtins,
            config: RuntimeConfig::default(),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn string(&self) -> TypeRef {
        self.builtins.string.clone()
    }

    pub fn number(&self) -> TypeRef {
        self.builtins.number.clone()
    }

    pub fn boolean(&self) -> TypeRef {
        self.builtins.boolean.clone()
    }

    /// The unparameterized map; construct through [`TypeRef::of`].
    pub fn map(&self) -> TypeRef {
        self.builtins.map.clone()
    }

    pub fn list(&self) -> TypeRef {
        self.builtins.list.clone()
    }

    pub fn map_of(&self, subtypes: impl Into<Subtypes>) -> TypeRef {
        self.builtins.map.of(subtypes)
    }

    pub fn list_of(&self, subtypes: impl Into<Subtypes>) -> TypeRef {
        self.builtins.list.of(subtypes)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeRef> {
        self.by_name
            .get(name)
            .map(|id| self.types[id.index()].type_ref())
    }

    /// Register a record type.
    ///
    /// `spec` receives a reference to the type being defined, so fields may
    /// refer back to it (those fields must be nullable).
    pub fn define<F, I, S>(&mut self, name: &str, spec: F) -> Result<TypeRef>
    where
        F: FnOnce(&TypeRef) -> I,
        I: IntoIterator<Item = (S, TypeRef)>,
        S: Into<String>,
    {
        let record = self.record(name);
        let this = record.this();
        spec(&this)
            .into_iter()
            .fold(record, |record, (field, ty)| record.field(field, ty))
            .build()
    }

    /// Fluent alternative to [`Self::define`].
    pub fn record(&mut self, name: &str) -> RecordBuilder<'_> {
        RecordBuilder::new(self, name)
    }

    pub(crate) fn next_id(&self) -> TypeId {
        TypeId(self.types.len() as u32)
    }

    pub(crate) fn mailbox(&self) -> Mailbox {
        Mailbox::new(self.sink.clone())
    }

    pub(crate) fn register_record(
        &mut self,
        name: String,
        tag: String,
        fields: Vec<FieldDescriptor>,
        capabilities: Capabilities,
    ) -> Result<TypeRef> {
        if self.by_name.contains_key(&name) {
            return Err(ModelError::DuplicateType(name));
        }
        if self.by_tag.contains_key(&tag) {
            return Err(ModelError::DuplicateType(tag));
        }

        let id = self.next_id();
        log::debug!(
            "[typemodel] registered type '{}' (tag '{}', {} fields)",
            name,
            tag,
            fields.len()
        );

        self.by_name.insert(name.clone(), id);
        self.by_tag.insert(tag.clone(), id);
        self.types.push(TypeDescriptor {
            id,
            name,
            tag,
            kind: TypeKind::Record(fields),
            capabilities,
        });
        Ok(self.types[id.index()].type_ref())
    }

    pub(crate) fn definition_failure(&self, path: &str, message: &str) -> ModelError {
        self.mailbox()
            .error(Diagnostic::definition("defineType error", path, message))
    }

    pub fn build(self) -> Arc<TypeRegistry> {
        log::debug!(
            "[typemodel] registry built with {} types (invalidation {:?})",
            self.types.len(),
            self.config.invalidation
        );
        Arc::new(TypeRegistry {
            types: self.types,
            by_name: self.by_name,
            by_tag: self.by_tag,
            builtins: self.builtins,
            mailbox: Mailbox::new(self.sink),
            config: self.config,
            clock: AtomicU64::new(0),
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_builtin(types: &mut Vec<TypeDescriptor>, name: &str, kind: TypeKind) -> TypeRef {
    let descriptor = TypeDescriptor {
        id: TypeId(types.len() as u32),
        name: name.to_string(),
        tag: name.to_string(),
        kind,
        capabilities: Capabilities::default(),
    };
    let type_ref = descriptor.type_ref();
    types.push(descriptor);
    type_ref
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Frozen set of descriptors plus the runtime state shared by all instances
/// built from it.
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    by_tag: HashMap<String, TypeId>,
    builtins: Builtins,
    config: RuntimeConfig,
    mailbox: Mailbox,
    clock: AtomicU64,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn string(&self) -> TypeRef {
        self.builtins.string.clone()
    }

    pub fn number(&self) -> TypeRef {
        self.builtins.number.clone()
    }

    pub fn boolean(&self) -> TypeRef {
        self.builtins.boolean.clone()
    }

    pub fn map(&self) -> TypeRef {
        self.builtins.map.clone()
    }

    pub fn list(&self) -> TypeRef {
        self.builtins.list.clone()
    }

    pub fn map_of(&self, subtypes: impl Into<Subtypes>) -> TypeRef {
        self.builtins.map.of(subtypes)
    }

    pub fn list_of(&self, subtypes: impl Into<Subtypes>) -> TypeRef {
        self.builtins.list.of(subtypes)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn tag_key(&self) -> &str {
        &self.config.tag_key
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    pub fn lookup(&self, name: &str) -> Option<TypeRef> {
        self.by_name
            .get(name)
            .map(|id| self.types[id.index()].type_ref())
    }

    pub fn lookup_tag(&self, tag: &str) -> Option<TypeRef> {
        self.by_tag
            .get(tag)
            .map(|id| self.types[id.index()].type_ref())
    }

    /// Descriptor behind `ty`, if `ty` was issued by this registry.
    pub fn descriptor(&self, ty: &TypeRef) -> Option<&TypeDescriptor> {
        self.types
            .get(ty.id().index())
            .filter(|d| d.name == ty.name())
    }

    pub(crate) fn owns(&self, ty: &TypeRef) -> bool {
        self.descriptor(ty).is_some()
    }

    pub(crate) fn fields_of(&self, ty: &TypeRef) -> &[FieldDescriptor] {
        match self.descriptor(ty) {
            Some(descriptor) => descriptor.fields(),
            None => &[],
        }
    }

    /// Structural validity of an already-typed value.
    pub fn test(&self, ty: &TypeRef, value: &TypedValue) -> bool {
        let Some(descriptor) = self.descriptor(ty) else {
            return false;
        };
        if let Some(test) = &descriptor.capabilities.test {
            return test(value);
        }
        match (value, ty.family()) {
            (TypedValue::Scalar(Value::Null), _) => ty.is_nullable(),
            (TypedValue::Scalar(raw), TypeFamily::Scalar(kind)) => {
                kind.accepts(raw) && ty.validator_accepts(raw)
            }
            (TypedValue::Instance(instance), _) => instance.type_ref().id() == ty.id(),
            _ => false,
        }
    }

    /// Fresh default payload for `ty`, as plain data.
    pub fn defaults(&self, ty: &TypeRef) -> Value {
        if let Some(default) = ty.default_value() {
            return default.clone();
        }
        let Some(descriptor) = self.descriptor(ty) else {
            return Value::Null;
        };
        if let Some(defaults) = &descriptor.capabilities.defaults {
            return defaults();
        }
        if ty.is_nullable() && !matches!(descriptor.kind, TypeKind::Scalar(_)) {
            return Value::Null;
        }
        match &descriptor.kind {
            TypeKind::Scalar(kind) => kind.default_value(),
            TypeKind::Record(fields) => Value::Object(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), self.defaults(&f.type_ref)))
                    .collect::<Map<String, Value>>(),
            ),
            TypeKind::Generic(GenericKind::Map) => Value::Object(Map::new()),
            TypeKind::Generic(GenericKind::List) => Value::Array(Vec::new()),
        }
    }

    /// Advance the change clock.
    pub(crate) fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn now(&self) -> u64 {
        self.clock.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.iter().map(|d| d.name()).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
