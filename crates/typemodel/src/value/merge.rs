// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Whole-value updates: shallow replace and recursive merge.

use super::input::Input;
use super::instance::{Payload, TypedInstance};
use super::typed::TypedValue;
use crate::diagnostics::{ErrorContext, Severity};
use crate::error::{ModelError, Result};
use crate::schema::{GenericKind, Subtypes, TypeFamily, TypeRef, TypeRegistry};
use indexmap::IndexMap;
use std::sync::Arc;

impl TypedInstance {
    /// Replace the whole payload with `value`, wrapped afresh.
    ///
    /// Marks the instance changed only if the result differs from the
    /// current payload in either direction (added, removed or replaced
    /// entries). Returns whether it changed. No-op on a read-only view.
    pub fn set_value(&self, value: impl Into<Input>) -> Result<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let registry = self.registry().clone();
        let mut ctx = self.update_context("setValue");
        let Some(next) = registry.build_payload(self.type_ref(), &value.into(), &mut ctx)? else {
            return Ok(false);
        };
        Ok(self.commit(|payload| {
            let changed = *payload != next;
            if changed {
                *payload = next;
            }
            (changed, changed)
        }))
    }

    /// Merge `value` into this instance recursively.
    ///
    /// For every incoming entry, an existing mutable nested instance that
    /// accepts the incoming data is updated in place (keeping its identity);
    /// anything else is wrapped afresh. On maps and lists, entries missing
    /// from the input are dropped and count as a change; records only update
    /// the fields present. Returns whether anything changed.
    pub fn set_value_deep(&self, value: impl Into<Input>) -> Result<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let registry = self.registry().clone();
        let input = value.into();
        let mut ctx = self.update_context("setValueDeep");
        registry.check_definition(self.type_ref(), &ctx)?;

        match self.family() {
            TypeFamily::Record => self.merge_record(&registry, &input, &mut ctx),
            TypeFamily::Generic(GenericKind::Map) => self.merge_map(&registry, &input, &mut ctx),
            TypeFamily::Generic(GenericKind::List) => self.merge_list(&registry, &input, &mut ctx),
            TypeFamily::Scalar(_) => Err(ModelError::invalid_operation(self.type_name(), "setValueDeep")),
        }
    }

    fn update_context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(
            format!("{} {} error", self.type_ref().name(), operation),
            Severity::Error,
            self.type_name(),
        )
    }

    fn merge_record(
        &self,
        registry: &Arc<TypeRegistry>,
        input: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<bool> {
        let Some(incoming) = registry.record_entries(self.type_ref(), input, ctx)? else {
            return Ok(false);
        };
        let Payload::Keyed(current) = self.snapshot() else {
            return Ok(false);
        };
        let Some(descriptor) = self.descriptor() else {
            return Ok(false);
        };

        let mut updates = IndexMap::new();
        let mut changed = false;
        for (key, child) in &incoming {
            let Some(field) = descriptor.field(key) else {
                continue;
            };
            let mark = ctx.enter(&format!(".{}", key));
            let (entry, entry_changed) =
                merge_entry(registry, current.get(key), child, Target::Field(&field.type_ref), ctx)?;
            ctx.leave(mark);
            changed |= entry_changed;
            if let Some(entry) = entry {
                updates.insert(key.clone(), entry);
            }
        }

        if changed {
            self.commit(|payload| {
                if let Payload::Keyed(fields) = payload {
                    fields.extend(updates);
                }
                ((), true)
            });
        }
        Ok(changed)
    }

    fn merge_map(
        &self,
        registry: &Arc<TypeRegistry>,
        input: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<bool> {
        let subtypes = registry.subtypes_of(self.type_ref(), ctx)?;
        let Some(incoming) = registry.map_entries(input, ctx)? else {
            return Ok(false);
        };
        let Payload::Keyed(current) = self.snapshot() else {
            return Ok(false);
        };

        let mut next = IndexMap::with_capacity(incoming.len());
        let mut changed = false;
        for (key, child) in &incoming {
            let mark = ctx.enter(&format!("[{}]", key));
            let (entry, entry_changed) =
                merge_entry(registry, current.get(key), child, Target::Subtypes(subtypes), ctx)?;
            ctx.leave(mark);
            changed |= entry_changed;
            if let Some(entry) = entry {
                next.insert(key.clone(), entry);
            }
        }
        changed |= current.keys().any(|key| !next.contains_key(key));

        if changed {
            self.commit(|payload| {
                *payload = Payload::Keyed(next);
                ((), true)
            });
        }
        Ok(changed)
    }

    fn merge_list(
        &self,
        registry: &Arc<TypeRegistry>,
        input: &Input,
        ctx: &mut ErrorContext,
    ) -> Result<bool> {
        let subtypes = registry.subtypes_of(self.type_ref(), ctx)?;
        let Some(incoming) = registry.list_items(input, ctx)? else {
            return Ok(false);
        };
        let Payload::Indexed(current) = self.snapshot() else {
            return Ok(false);
        };

        let mut next = Vec::with_capacity(incoming.len());
        let mut changed = current.len() != incoming.len();
        for (index, child) in incoming.iter().enumerate() {
            let mark = ctx.enter(&format!("[{}]", index));
            let (item, item_changed) =
                merge_entry(registry, current.get(index), child, Target::Subtypes(subtypes), ctx)?;
            ctx.leave(mark);
            changed |= item_changed;
            if let Some(item) = item {
                next.push(item);
            }
        }

        if changed {
            self.commit(|payload| {
                *payload = Payload::Indexed(next);
                ((), true)
            });
        }
        Ok(changed)
    }
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Field(&'a TypeRef),
    Subtypes(&'a Subtypes),
}

/// Merge one incoming entry over the stored one.
fn merge_entry(
    registry: &Arc<TypeRegistry>,
    current: Option<&TypedValue>,
    incoming: &Input,
    target: Target<'_>,
    ctx: &mut ErrorContext,
) -> Result<(Option<TypedValue>, bool)> {
    if let Some(stored) = current {
        if incoming.is_identical_to(stored) || same_payload(incoming, stored) {
            return Ok((Some(stored.clone()), false));
        }
        if let TypedValue::Instance(child) = stored {
            // null clears a nullable slot, it is never merged into the child
            if !incoming.is_null() && accepts_in_place(registry, child, incoming, target) {
                let changed = child.set_value_deep(incoming.clone())?;
                return Ok((Some(stored.clone()), changed));
            }
        }
    }

    let wrapped = match target {
        Target::Field(ty) => registry.wrap_entry(ty, incoming, ctx)?,
        Target::Subtypes(subtypes) => registry.wrap_against(subtypes, incoming, ctx)?,
    };
    Ok((wrapped, true))
}

/// A stored child can absorb `incoming` if it is mutable, is still allowed
/// where it sits, and accepts the data as its own type.
fn accepts_in_place(
    registry: &TypeRegistry,
    child: &TypedInstance,
    incoming: &Input,
    target: Target<'_>,
) -> bool {
    if child.is_read_only() {
        return false;
    }
    if let Some(tag) = incoming.plain_tag(registry.tag_key()) {
        if tag != child.type_ref().tag() {
            return false;
        }
    }
    let allowed_here = match target {
        Target::Field(ty) => ty.same_type(child.type_ref()),
        Target::Subtypes(subtypes) => subtypes.iter().any(|ty| ty.same_type(child.type_ref())),
    };
    allowed_here && registry.validate(child.type_ref(), incoming)
}

/// `incoming` is a view (e.g. the projection) of the stored instance.
fn same_payload(incoming: &Input, stored: &TypedValue) -> bool {
    match (incoming, stored) {
        (Input::Typed(a), TypedValue::Instance(b)) => a.shares_payload(b),
        _ => false,
    }
}
