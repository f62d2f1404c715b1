// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Index access for lists.

use super::input::Input;
use super::instance::{Payload, TypedInstance};
use super::typed::TypedValue;
use crate::diagnostics::{ErrorContext, Severity};
use crate::error::{ModelError, Result};
use crate::schema::{GenericKind, TypeFamily};

impl TypedInstance {
    pub(crate) fn is_list(&self) -> bool {
        self.family() == TypeFamily::Generic(GenericKind::List)
    }

    pub fn at(&self, index: usize) -> Option<TypedValue> {
        let value = self.read(|payload| match payload {
            Payload::Indexed(items) => items.get(index).cloned(),
            Payload::Keyed(_) => None,
        })?;
        Some(self.expose(value))
    }

    /// Replace the item at `index`. No-op on a read-only view.
    pub fn set_at(&self, index: usize, value: impl Into<Input>) -> Result<&Self> {
        if self.is_read_only() {
            log::trace!("[typemodel] set_at({}) ignored on read-only {}", index, self.type_name());
            return Ok(self);
        }
        let len = self.len();
        if index >= len {
            return Err(ModelError::IndexOutOfBounds { index, len });
        }
        if let Some(item) = self.wrap_item(index, &value.into(), "set")? {
            self.commit(|payload| {
                let replaced = match payload {
                    Payload::Indexed(items) if index < items.len() => {
                        items[index] = item;
                        true
                    }
                    _ => false,
                };
                ((), replaced)
            });
        }
        Ok(self)
    }

    /// Append an item; returns the new length. No-op on a read-only view.
    pub fn push(&self, value: impl Into<Input>) -> Result<usize> {
        if self.is_read_only() {
            return Ok(self.len());
        }
        let index = self.len();
        if let Some(item) = self.wrap_item(index, &value.into(), "push")? {
            self.commit(|payload| match payload {
                Payload::Indexed(items) => {
                    items.push(item);
                    ((), true)
                }
                Payload::Keyed(_) => ((), false),
            });
        }
        Ok(self.len())
    }

    pub fn pop(&self) -> Option<TypedValue> {
        if self.is_read_only() {
            return None;
        }
        let popped = self.commit(|payload| match payload {
            Payload::Indexed(items) => {
                let popped = items.pop();
                let changed = popped.is_some();
                (popped, changed)
            }
            Payload::Keyed(_) => (None, false),
        })?;
        Some(self.expose(popped))
    }

    /// Remove and return the item at `index`.
    pub fn remove_at(&self, index: usize) -> Option<TypedValue> {
        if self.is_read_only() {
            return None;
        }
        self.commit(|payload| match payload {
            Payload::Indexed(items) if index < items.len() => (Some(items.remove(index)), true),
            _ => (None, false),
        })
    }

    fn wrap_item(&self, index: usize, input: &Input, operation: &str) -> Result<Option<TypedValue>> {
        if !self.is_list() {
            return Err(ModelError::invalid_operation(self.type_name(), operation));
        }
        let registry = self.registry().clone();
        let mut ctx = ErrorContext::new(
            format!("{} {} error", self.type_ref().name(), operation),
            Severity::Error,
            self.type_name(),
        );
        let subtypes = registry.subtypes_of(self.type_ref(), &ctx)?;
        let mark = ctx.enter(&format!("[{}]", index));
        let wrapped = registry.wrap_against(subtypes, input, &mut ctx)?;
        ctx.leave(mark);
        Ok(wrapped)
    }
}
