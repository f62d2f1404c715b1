// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Validate/wrap pipeline.
//!
//! Turns [`Input`] into typed payloads. Every nested entry is wrapped into a
//! [`TypedValue`] (scalar leaf or instance), never left as raw structure.
//! Mismatches are posted through the registry mailbox at the level carried by
//! the [`ErrorContext`]; at `Warn` the offending entry is skipped.

use super::input::{Input, Shape};
use super::instance::{Payload, TypedInstance};
use super::typed::TypedValue;
use crate::diagnostics::{Diagnostic, ErrorContext, Severity};
use crate::error::{ModelError, Result};
use crate::schema::{GenericKind, Subtypes, TypeFamily, TypeRef, TypeRegistry};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Failure found by the structural check: where, what was wanted, what came.
struct PlainMismatch {
    path: String,
    expected: String,
    actual: String,
}

type PlainCheck = std::result::Result<(), PlainMismatch>;

impl TypeRegistry {
    // ----- Predicates -----

    /// `value` is already an instance of exactly `ty`.
    pub fn validate_type(&self, ty: &TypeRef, value: &Input) -> bool {
        match value {
            Input::Typed(instance) => instance.type_ref().same_type(ty),
            _ => false,
        }
    }

    /// `value` can become a `ty`, either as-is or by wrapping.
    pub fn validate(&self, ty: &TypeRef, value: &Input) -> bool {
        self.validate_type(ty, value) || self.allow_plain_val(ty, value)
    }

    /// The raw payload of `value` is structurally acceptable for `ty`,
    /// including every nested entry.
    pub fn allow_plain_val(&self, ty: &TypeRef, value: &Input) -> bool {
        let mut path = String::new();
        self.check_plain(ty, value, &mut path).is_ok()
    }

    /// A non-empty plain object names at least one of the record's declared
    /// fields. Always true for other types and shapes.
    pub(crate) fn shares_declared_field(&self, ty: &TypeRef, value: &Input) -> bool {
        if ty.family() != TypeFamily::Record {
            return true;
        }
        let Shape::Object(entries) = value.shape() else {
            return true;
        };
        let tag_key = self.tag_key();
        let mut keys = entries.iter().map(|(k, _)| k.as_str()).filter(|k| *k != tag_key).peekable();
        keys.peek().is_none() || keys.any(|k| self.fields_of(ty).iter().any(|f| f.name == k))
    }

    /// Like [`Self::allow_plain_val`], describing the first failure.
    pub fn explain_plain_val(&self, ty: &TypeRef, value: &Input) -> Option<Diagnostic> {
        let mut path = ty.to_string();
        self.check_plain(ty, value, &mut path)
            .err()
            .map(|m| Diagnostic::type_mismatch("allowPlainVal", m.path, m.expected, m.actual))
    }

    fn check_plain(&self, ty: &TypeRef, value: &Input, path: &mut String) -> PlainCheck {
        let fail = |path: &str, expected: String| PlainMismatch {
            path: path.to_string(),
            expected,
            actual: value.describe(),
        };

        if value.is_null() {
            return if ty.is_nullable() {
                Ok(())
            } else {
                Err(fail(path.as_str(), ty.to_string()))
            };
        }
        if ty.pending_definition_error().is_some() {
            return Err(fail(path.as_str(), ty.to_string()));
        }

        match ty.family() {
            TypeFamily::Scalar(kind) => match value {
                Input::Plain(raw) if kind.accepts(raw) && ty.validator_accepts(raw) => Ok(()),
                _ => Err(fail(path.as_str(), ty.to_string())),
            },
            TypeFamily::Record => match value.shape() {
                Shape::Object(entries) => {
                    for field in self.fields_of(ty) {
                        let Some((_, child)) = entries.iter().find(|(k, _)| *k == field.name) else {
                            continue;
                        };
                        let mark = path.len();
                        path.push('.');
                        path.push_str(&field.name);
                        if !self.validate_type(&field.type_ref, child) {
                            self.check_plain(&field.type_ref, child, path)?;
                        }
                        path.truncate(mark);
                    }
                    Ok(())
                }
                Shape::Typed(instance) if instance.type_ref().id() == ty.id() => Ok(()),
                _ => Err(fail(path.as_str(), ty.to_string())),
            },
            TypeFamily::Generic(kind) => {
                let Some(subtypes) = ty.subtypes() else {
                    return Err(fail(path.as_str(), ty.to_string()));
                };
                let Some(entries) = self.plain_entries(kind, value) else {
                    return Err(fail(path.as_str(), ty.to_string()));
                };
                for (key, child) in entries {
                    let Some(key) = key else {
                        return Err(fail(path.as_str(), "string key".to_string()));
                    };
                    if kind == GenericKind::Map && key == self.tag_key() {
                        continue;
                    }
                    if subtypes.resolve(self, &child).is_none() {
                        path.push('[');
                        path.push_str(&key);
                        path.push(']');
                        return Err(PlainMismatch {
                            path: path.clone(),
                            expected: subtypes.unwrapped(),
                            actual: child.describe(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Entries of a generic payload for the structural check; `None` key
    /// marks a non-string key.
    fn plain_entries(&self, kind: GenericKind, value: &Input) -> Option<Vec<(Option<String>, Input)>> {
        match (kind, value.shape()) {
            (GenericKind::Map, Shape::Object(entries)) => {
                Some(entries.into_iter().map(|(k, v)| (Some(k), v)).collect())
            }
            (GenericKind::Map, Shape::List(items)) => items
                .iter()
                .map(|item| {
                    item.as_pair().map(|(k, v)| match k {
                        Input::Plain(Value::String(k)) => (Some(k), v),
                        _ => (None, v),
                    })
                })
                .collect(),
            (GenericKind::List, Shape::List(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (Some(i.to_string()), v))
                    .collect(),
            ),
            (_, Shape::Typed(instance)) if instance.family() == TypeFamily::Generic(kind) => {
                Some(raw_entries(&instance).into_iter().map(|(k, v)| (Some(k), v)).collect())
            }
            _ => None,
        }
    }

    // ----- Wrapping -----

    /// Wrap one entry against a known type.
    ///
    /// An instance that already is a `ty` is kept as-is, read-only or not.
    /// Returns `Ok(None)` when a mismatch was posted at `Warn`.
    pub(crate) fn wrap_entry(
        self: &Arc<Self>,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<TypedValue>> {
        if value.is_null() {
            if ty.is_nullable() {
                return Ok(Some(TypedValue::Scalar(Value::Null)));
            }
            let diag = ctx.mismatch(ty.to_string(), "null");
            ctx.report(self.mailbox(), diag)?;
            return Ok(None);
        }

        if let TypeFamily::Scalar(kind) = ty.family() {
            return match value {
                Input::Plain(raw) if kind.accepts(raw) && ty.validator_accepts(raw) => {
                    Ok(Some(TypedValue::Scalar(raw.clone())))
                }
                _ => {
                    let diag = ctx.mismatch(ty.to_string(), value.describe());
                    ctx.report(self.mailbox(), diag)?;
                    Ok(None)
                }
            };
        }

        if let Input::Typed(instance) = value {
            if self.validate_type(ty, value) {
                return Ok(Some(TypedValue::Instance(instance.clone())));
            }
        }

        Ok(self
            .build_payload(ty, value, ctx)?
            .map(|payload| TypedValue::Instance(TypedInstance::new(self.clone(), ty.clone(), payload))))
    }

    /// Resolve the entry's type among `subtypes`, then wrap it.
    pub(crate) fn wrap_against(
        self: &Arc<Self>,
        subtypes: &Subtypes,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<TypedValue>> {
        match subtypes.resolve(self, value) {
            Some(ty) => {
                let ty = ty.clone();
                self.wrap_entry(&ty, value, ctx)
            }
            None => {
                let diag = ctx.mismatch(subtypes.unwrapped(), value.describe());
                ctx.report(self.mailbox(), diag)?;
                Ok(None)
            }
        }
    }

    /// Build a fresh payload for a record or container type.
    ///
    /// Pending definition errors are raised first, on every call.
    pub(crate) fn build_payload(
        self: &Arc<Self>,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Payload>> {
        self.check_definition(ty, ctx)?;
        match ty.family() {
            TypeFamily::Record => self.build_record(ty, value, ctx),
            TypeFamily::Generic(GenericKind::Map) => self.build_map(ty, value, ctx),
            TypeFamily::Generic(GenericKind::List) => self.build_list(ty, value, ctx),
            TypeFamily::Scalar(_) => Err(ModelError::invalid_operation(
                ty.to_string(),
                "instance construction",
            )),
        }
    }

    pub(crate) fn check_definition(&self, ty: &TypeRef, ctx: &ErrorContext) -> Result<()> {
        match ty.pending_definition_error() {
            Some(err) => Err(self.mailbox().error(ctx.definition(&err.path, &err.message))),
            None => Ok(()),
        }
    }

    fn build_record(
        self: &Arc<Self>,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Payload>> {
        let Some(provided) = self.record_entries(ty, value, ctx)? else {
            return Ok(None);
        };

        let mut fields = IndexMap::with_capacity(self.fields_of(ty).len());
        for field in self.fields_of(ty) {
            let mark = ctx.enter(&format!(".{}", field.name));
            let wrapped = match provided.iter().find(|(k, _)| *k == field.name) {
                Some((_, child)) => self.wrap_entry(&field.type_ref, child, ctx)?,
                None => None,
            };
            let entry = match wrapped {
                Some(entry) => entry,
                None => self.default_entry(&field.type_ref, ctx)?,
            };
            ctx.leave(mark);
            fields.insert(field.name.clone(), entry);
        }
        Ok(Some(Payload::Keyed(fields)))
    }

    /// Field defaults are wrapped like any other input.
    fn default_entry(self: &Arc<Self>, ty: &TypeRef, ctx: &mut ErrorContext) -> Result<TypedValue> {
        let raw = Input::Plain(self.defaults(ty));
        Ok(self
            .wrap_entry(ty, &raw, ctx)?
            .unwrap_or(TypedValue::Scalar(Value::Null)))
    }

    fn build_map(
        self: &Arc<Self>,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Payload>> {
        let subtypes = self.subtypes_of(ty, ctx)?;
        let Some(incoming) = self.map_entries(value, ctx)? else {
            return Ok(None);
        };

        let mut entries = IndexMap::with_capacity(incoming.len());
        for (key, child) in incoming {
            let mark = ctx.enter(&format!("[{}]", key));
            let wrapped = self.wrap_against(subtypes, &child, ctx)?;
            ctx.leave(mark);
            if let Some(entry) = wrapped {
                entries.insert(key, entry);
            }
        }
        Ok(Some(Payload::Keyed(entries)))
    }

    fn build_list(
        self: &Arc<Self>,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Payload>> {
        let subtypes = self.subtypes_of(ty, ctx)?;
        let Some(incoming) = self.list_items(value, ctx)? else {
            return Ok(None);
        };

        let mut items = Vec::with_capacity(incoming.len());
        for (index, child) in incoming.iter().enumerate() {
            let mark = ctx.enter(&format!("[{}]", index));
            let wrapped = self.wrap_against(subtypes, child, ctx)?;
            ctx.leave(mark);
            if let Some(item) = wrapped {
                items.push(item);
            }
        }
        Ok(Some(Payload::Indexed(items)))
    }

    pub(crate) fn subtypes_of<'t>(&self, ty: &'t TypeRef, ctx: &ErrorContext) -> Result<&'t Subtypes> {
        self.check_definition(ty, ctx)?;
        ty.subtypes()
            .ok_or_else(|| ModelError::invalid_operation(ty.to_string(), "untyped container access"))
    }

    // ----- Input decomposition -----

    /// Provided fields for a record: a structural object, or another instance
    /// of the same record type.
    pub(crate) fn record_entries(
        &self,
        ty: &TypeRef,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Vec<(String, Input)>>> {
        match value.shape() {
            Shape::Object(entries) => Ok(Some(entries)),
            Shape::Typed(instance) if instance.type_ref().id() == ty.id() => {
                Ok(Some(raw_entries(&instance)))
            }
            Shape::Typed(instance) => {
                let diag = ctx.mismatch(ty.to_string(), format!("instance of {}", instance.type_ref()));
                ctx.report(self.mailbox(), diag)?;
                Ok(None)
            }
            _ => {
                let diag = ctx.malformed(value.describe());
                ctx.report(self.mailbox(), diag)?;
                Ok(None)
            }
        }
    }

    /// String-keyed map entries from an object, a pair sequence or another
    /// map instance. Non-string keys and non-pair items are reported and
    /// skipped; the discriminant key is dropped.
    pub(crate) fn map_entries(
        &self,
        value: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<Option<Vec<(String, Input)>>> {
        let tag_key = self.tag_key();
        let pairs: Vec<(Input, Input)> = match value.shape() {
            Shape::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| (Input::Plain(Value::String(k)), v))
                .collect(),
            Shape::List(items) => {
                let mut pairs = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item.as_pair() {
                        Some(pair) => pairs.push(pair),
                        None => {
                            let mark = ctx.enter(&format!("[{}]", index));
                            let diag = ctx.malformed(item.describe());
                            ctx.leave(mark);
                            ctx.report(self.mailbox(), diag)?;
                        }
                    }
                }
                pairs
            }
            Shape::Typed(instance) if instance.family() == TypeFamily::Generic(GenericKind::Map) => {
                raw_entries(&instance)
                    .into_iter()
                    .map(|(k, v)| (Input::Plain(Value::String(k)), v))
                    .collect()
            }
            _ => {
                let diag = ctx.malformed(value.describe());
                ctx.report(self.mailbox(), diag)?;
                return Ok(None);
            }
        };

        let mut entries = Vec::with_capacity(pairs.len());
        for (key, child) in pairs {
            match key {
                Input::Plain(Value::String(key)) if key == tag_key => {}
                Input::Plain(Value::String(key)) => entries.push((key, child)),
                other => {
                    let diag = ctx.key_mismatch(other.describe());
                    ctx.report(self.mailbox(), diag)?;
                }
            }
        }
        Ok(Some(entries))
    }

    /// Items from a sequence or another list instance.
    pub(crate) fn list_items(&self, value: &Input, ctx: &mut ErrorContext) -> Result<Option<Vec<Input>>> {
        match value.shape() {
            Shape::List(items) => Ok(Some(items)),
            Shape::Typed(instance)
                if instance.family() == TypeFamily::Generic(GenericKind::List) =>
            {
                Ok(Some(raw_entries(&instance).into_iter().map(|(_, v)| v).collect()))
            }
            _ => {
                let diag = ctx.malformed(value.describe());
                ctx.report(self.mailbox(), diag)?;
                Ok(None)
            }
        }
    }

    // ----- Construction -----

    /// Build a new instance of `ty` from `input`.
    ///
    /// Per-entry mismatches use the configured construction level (fatal by
    /// default). Always builds a new container, even from an instance of
    /// the same type; nested instances that already match keep their
    /// identity.
    pub fn create(self: &Arc<Self>, ty: &TypeRef, input: impl Into<Input>) -> Result<TypedInstance> {
        let level = self.config().construction_level;
        self.construct(ty, &input.into(), level)
            .map(|(instance, _)| instance)
    }

    /// [`Self::create`], handing back the read-only projection.
    pub fn create_read_only(
        self: &Arc<Self>,
        ty: &TypeRef,
        input: impl Into<Input>,
    ) -> Result<TypedInstance> {
        Ok(self.create(ty, input)?.as_read_only())
    }

    /// Build leniently: bad entries are skipped with a warning and the last
    /// diagnostic is returned alongside the instance. Definition errors and
    /// an uninterpretable top-level payload still fail.
    pub fn create_lenient(
        self: &Arc<Self>,
        ty: &TypeRef,
        input: impl Into<Input>,
    ) -> Result<(TypedInstance, Option<Diagnostic>)> {
        self.construct(ty, &input.into(), Severity::Warn)
    }

    /// Instance built from `ty`'s defaults.
    pub fn default_instance(self: &Arc<Self>, ty: &TypeRef) -> Result<TypedInstance> {
        let defaults = self.defaults(ty);
        self.create(ty, defaults)
    }

    /// Wrap any input, scalars included, with entry semantics: an instance
    /// that already is a `ty` comes back unchanged.
    pub fn wrap(self: &Arc<Self>, ty: &TypeRef, input: impl Into<Input>) -> Result<TypedValue> {
        if !self.owns(ty) {
            return Err(ModelError::UnknownType(ty.to_string()));
        }
        let mut ctx = ErrorContext::new(
            format!("{} wrap error", ty.name()),
            Severity::Error,
            ty.to_string(),
        );
        self.check_definition(ty, &ctx)?;
        match self.wrap_entry(ty, &input.into(), &mut ctx)? {
            Some(value) => Ok(value),
            None => Err(unwrapped_failure(ty, ctx)),
        }
    }

    /// Rebuild tagged plain data using its own discriminant.
    pub fn revive(self: &Arc<Self>, input: impl Into<Input>) -> Result<TypedInstance> {
        let input = input.into();
        let Some(tag) = input.plain_tag(self.tag_key()) else {
            let diag = Diagnostic::malformed("revive error", "", input.describe());
            return Err(self.mailbox().error(diag));
        };
        let ty = self
            .lookup_tag(&tag)
            .ok_or_else(|| ModelError::UnknownType(tag.clone()))?;
        self.create(&ty, input)
    }

    fn construct(
        self: &Arc<Self>,
        ty: &TypeRef,
        input: &Input,
        level: Severity,
    ) -> Result<(TypedInstance, Option<Diagnostic>)> {
        if !self.owns(ty) {
            return Err(ModelError::UnknownType(ty.to_string()));
        }
        let mut ctx = ErrorContext::new(
            format!("{} constructor error", ty.name()),
            level,
            ty.to_string(),
        );
        match self.build_payload(ty, input, &mut ctx)? {
            Some(payload) => {
                let instance = TypedInstance::new(self.clone(), ty.clone(), payload);
                Ok((instance, ctx.into_last_diagnostic()))
            }
            None => Err(unwrapped_failure(ty, ctx)),
        }
    }
}

fn unwrapped_failure(ty: &TypeRef, ctx: ErrorContext) -> ModelError {
    match ctx.into_last_diagnostic() {
        Some(diag) => ModelError::from(diag),
        None => ModelError::invalid_operation(ty.to_string(), "construction"),
    }
}

/// Stored entries of an instance as input, keys stringified for lists.
pub(crate) fn raw_entries(instance: &TypedInstance) -> Vec<(String, Input)> {
    instance.read(|payload| match payload {
        Payload::Keyed(entries) => entries
            .iter()
            .map(|(k, v)| (k.clone(), Input::from(v)))
            .collect(),
        Payload::Indexed(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), Input::from(v)))
            .collect(),
    })
}
