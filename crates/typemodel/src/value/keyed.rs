// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Keyed access for maps and records, plus iteration shared with lists.
//!
//! Mutators on a read-only view return without touching anything and without
//! posting a diagnostic. Accessors on a read-only view project nested
//! instances read-only as they are handed out.

use super::input::Input;
use super::instance::{Payload, TypedInstance};
use super::typed::TypedValue;
use crate::diagnostics::{ErrorContext, Severity};
use crate::error::{ModelError, Result};
use crate::schema::{GenericKind, TypeFamily};

impl TypedInstance {
    /// Stored entry under `key`.
    ///
    /// Asking a record for an undeclared field posts a `KeyMismatch` warning
    /// and yields `None`.
    pub fn get(&self, key: &str) -> Option<TypedValue> {
        if self.is_record() && self.descriptor().and_then(|d| d.field(key)).is_none() {
            let ctx = ErrorContext::new(
                format!("{} get error", self.type_ref().name()),
                Severity::Warn,
                self.type_name(),
            );
            self.registry().mailbox().warn(ctx.key_mismatch(format!("{:?}", key)));
            return None;
        }
        let value = self.read(|payload| match payload {
            Payload::Keyed(entries) => entries.get(key).cloned(),
            Payload::Indexed(_) => None,
        })?;
        Some(self.expose(value))
    }

    pub fn has(&self, key: &str) -> bool {
        self.read(|payload| match payload {
            Payload::Keyed(entries) => entries.contains_key(key),
            Payload::Indexed(_) => false,
        })
    }

    /// Store `value` under `key` after validating it against the declared
    /// field type (records) or subtype constraint (maps).
    ///
    /// Returns the receiver for chaining. No-op on a read-only view.
    pub fn set(&self, key: &str, value: impl Into<Input>) -> Result<&Self> {
        if self.is_read_only() {
            log::trace!("[typemodel] set('{}') ignored on read-only {}", key, self.type_name());
            return Ok(self);
        }

        let registry = self.registry().clone();
        let input = value.into();
        let mut ctx = ErrorContext::new(
            format!("{} set error", self.type_ref().name()),
            Severity::Error,
            self.type_name(),
        );

        let wrapped = match self.family() {
            TypeFamily::Record => {
                let mark = ctx.enter(&format!(".{}", key));
                let Some(field) = self.descriptor().and_then(|d| d.field(key)).cloned() else {
                    let diag = ctx.key_mismatch(format!("{:?}", key));
                    return Err(registry.mailbox().error(diag));
                };
                let wrapped = registry.wrap_entry(&field.type_ref, &input, &mut ctx)?;
                ctx.leave(mark);
                wrapped
            }
            TypeFamily::Generic(GenericKind::Map) => {
                let mark = ctx.enter(&format!("[{}]", key));
                if key == registry.tag_key() {
                    let diag = ctx.key_mismatch(format!("reserved key {:?}", key));
                    return Err(registry.mailbox().error(diag));
                }
                let subtypes = registry.subtypes_of(self.type_ref(), &ctx)?;
                let wrapped = registry.wrap_against(subtypes, &input, &mut ctx)?;
                ctx.leave(mark);
                wrapped
            }
            _ => return Err(ModelError::invalid_operation(self.type_name(), "set by key")),
        };

        if let Some(entry) = wrapped {
            self.commit(|payload| {
                if let Payload::Keyed(entries) = payload {
                    entries.insert(key.to_string(), entry);
                }
                ((), true)
            });
        }
        Ok(self)
    }

    /// Remove the entry under `key`; returns whether something was removed.
    ///
    /// Record fields cannot be removed.
    pub fn delete(&self, key: &str) -> bool {
        if self.is_read_only() || self.family() != TypeFamily::Generic(GenericKind::Map) {
            return false;
        }
        self.commit(|payload| {
            let removed = match payload {
                Payload::Keyed(entries) => entries.shift_remove(key).is_some(),
                Payload::Indexed(_) => false,
            };
            (removed, removed)
        })
    }

    /// Remove every entry of a map or list. No-op on records and read-only
    /// views.
    pub fn clear(&self) {
        if self.is_read_only() || self.is_record() {
            return;
        }
        self.commit(|payload| {
            let had_entries = payload.len() > 0;
            match payload {
                Payload::Keyed(entries) => entries.clear(),
                Payload::Indexed(items) => items.clear(),
            }
            ((), had_entries)
        });
    }

    /// Number of entries (fields, map entries or list items).
    pub fn len(&self) -> usize {
        self.read(Payload::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in payload order; list indices are rendered as strings.
    pub fn keys(&self) -> Vec<String> {
        self.read(|payload| match payload {
            Payload::Keyed(entries) => entries.keys().cloned().collect(),
            Payload::Indexed(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        })
    }

    pub fn values(&self) -> Vec<TypedValue> {
        let values: Vec<TypedValue> = self.read(|payload| payload.values().cloned().collect());
        values.into_iter().map(|v| self.expose(v)).collect()
    }

    /// Shallow `(key, value)` pairs; nested instances stay typed.
    pub fn entries(&self) -> Vec<(String, TypedValue)> {
        let entries: Vec<(String, TypedValue)> = self.read(|payload| match payload {
            Payload::Keyed(entries) => entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Payload::Indexed(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
        });
        entries
            .into_iter()
            .map(|(k, v)| (k, self.expose(v)))
            .collect()
    }

    /// Visit every entry; the payload is snapshotted first, so the callback
    /// may mutate this instance.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&TypedValue, &str),
    {
        for (key, value) in self.entries() {
            visit(&value, &key);
        }
    }
}
