// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for record types.

use super::descriptor::{Capabilities, FieldDescriptor, TypeFamily};
use super::registry::RegistryBuilder;
use super::type_ref::TypeRef;
use crate::error::Result;
use crate::value::TypedValue;
use serde_json::Value;
use std::collections::HashSet;

/// Builder for a record type.
///
/// # Example
///
/// ```rust
/// use typemodel::TypeRegistry;
///
/// let mut builder = TypeRegistry::builder();
/// let string = builder.string();
/// let node = {
///     let record = builder.record("Node").tag("NodeType");
///     let this = record.this();
///     record
///         .field("label", string)
///         .field("next", this.nullable())
///         .build()
///         .unwrap()
/// };
/// assert_eq!(node.tag(), "NodeType");
/// ```
pub struct RecordBuilder<'a> {
    registry: &'a mut RegistryBuilder,
    name: String,
    tag: Option<String>,
    fields: Vec<FieldDescriptor>,
    capabilities: Capabilities,
}

impl<'a> RecordBuilder<'a> {
    pub(crate) fn new(registry: &'a mut RegistryBuilder, name: &str) -> Self {
        Self {
            registry,
            name: name.to_string(),
            tag: None,
            fields: Vec::new(),
            capabilities: Capabilities::default(),
        }
    }

    /// Discriminant written under the tag key; defaults to the name.
    /// Set it before calling [`Self::this`].
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            type_ref,
        });
        self
    }

    /// Replace the generated `test` capability.
    pub fn test<F>(mut self, test: F) -> Self
    where
        F: Fn(&TypedValue) -> bool + Send + Sync + 'static,
    {
        self.capabilities = self.capabilities.with_test(test);
        self
    }

    /// Replace the generated `defaults` capability.
    pub fn defaults<F>(mut self, defaults: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.capabilities = self.capabilities.with_defaults(defaults);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Reference to the record under construction, for self-referencing fields.
    pub fn this(&self) -> TypeRef {
        TypeRef::new(
            self.registry.next_id(),
            TypeFamily::Record,
            &self.name,
            self.tag.as_deref().unwrap_or(&self.name),
        )
    }

    pub fn build(self) -> Result<TypeRef> {
        let Self {
            registry,
            name,
            tag,
            fields,
            capabilities,
        } = self;
        let own_id = registry.next_id();
        let tag_key = registry.config().tag_key.clone();

        let mut seen = HashSet::new();
        for field in &fields {
            let path = format!("{}.{}", name, field.name);
            if field.name.is_empty() {
                return Err(registry.definition_failure(&name, "empty field name"));
            }
            if field.name == tag_key {
                return Err(registry.definition_failure(
                    &path,
                    &format!("'{}' is reserved for the type tag", tag_key),
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(registry.definition_failure(&path, "duplicate field"));
            }
            if let Some(err) = field.type_ref.pending_definition_error() {
                return Err(registry.definition_failure(
                    &format!("{}<{}>", path, err.path),
                    &err.message,
                ));
            }
            if field.type_ref.id() == own_id
                && field.type_ref.family() == TypeFamily::Record
                && !field.type_ref.is_nullable()
                && field.type_ref.default_value().is_none()
            {
                return Err(registry.definition_failure(
                    &path,
                    "self-referencing field must be nullable or carry a default",
                ));
            }
        }

        let tag = tag.unwrap_or_else(|| name.clone());
        registry.register_record(name, tag, fields, capabilities)
    }
}
