// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed instances.
//!
//! An instance is a cheap handle (`Arc<Node>`) onto a shared [`Core`] that
//! owns the payload. A read-only projection is a second node over the same
//! core, created once and cached on the mutable node, so projecting is O(1)
//! and identity-stable.

use super::typed::TypedValue;
use crate::schema::{TypeDescriptor, TypeFamily, TypeRef, TypeRegistry};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    /// Record fields or map entries, in insertion order.
    Keyed(IndexMap<String, TypedValue>),
    /// List items.
    Indexed(Vec<TypedValue>),
}

impl Payload {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Keyed(entries) => entries.len(),
            Self::Indexed(items) => items.len(),
        }
    }

    pub(crate) fn values(&self) -> Box<dyn Iterator<Item = &TypedValue> + '_> {
        match self {
            Self::Keyed(entries) => Box::new(entries.values()),
            Self::Indexed(items) => Box::new(items.iter()),
        }
    }
}

pub(crate) struct State {
    pub(crate) payload: Payload,
    /// Clock value of the last mutation.
    pub(crate) last_change: u64,
    /// Clock value at the last `revalidate`.
    pub(crate) checkpoint: u64,
    /// Memoised answer in latched invalidation mode.
    pub(crate) latched: Option<bool>,
}

pub(crate) struct Core {
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) type_ref: TypeRef,
    pub(crate) state: RwLock<State>,
}

struct Node {
    core: Arc<Core>,
    read_only: bool,
    projection: OnceLock<TypedInstance>,
}

/// A value conforming to one record or container type.
///
/// Clones are handles to the same instance; equality is identity.
#[derive(Clone)]
pub struct TypedInstance {
    node: Arc<Node>,
}

impl TypedInstance {
    pub(crate) fn new(registry: Arc<TypeRegistry>, type_ref: TypeRef, payload: Payload) -> Self {
        let now = registry.now();
        let core = Core {
            registry,
            type_ref,
            state: RwLock::new(State {
                payload,
                last_change: now,
                checkpoint: now,
                latched: None,
            }),
        };
        Self {
            node: Arc::new(Node {
                core: Arc::new(core),
                read_only: false,
                projection: OnceLock::new(),
            }),
        }
    }

    pub(crate) fn core(&self) -> &Core {
        &self.node.core
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.node.core.type_ref
    }

    pub fn type_name(&self) -> String {
        self.type_ref().to_string()
    }

    pub fn family(&self) -> TypeFamily {
        self.type_ref().family()
    }

    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        self.node.core.registry.descriptor(self.type_ref())
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.node.core.registry
    }

    pub fn is_read_only(&self) -> bool {
        self.node.read_only
    }

    /// Read-only projection sharing this instance's payload.
    ///
    /// Repeated calls return the same projection; a read-only instance
    /// returns itself.
    pub fn as_read_only(&self) -> TypedInstance {
        if self.node.read_only {
            return self.clone();
        }
        self.node
            .projection
            .get_or_init(|| TypedInstance {
                node: Arc::new(Node {
                    core: self.node.core.clone(),
                    read_only: true,
                    projection: OnceLock::new(),
                }),
            })
            .clone()
    }

    /// Same instance (a projection is a different instance from its source).
    pub fn ptr_eq(&self, other: &TypedInstance) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Same underlying payload, e.g. a source and its projection.
    pub fn shares_payload(&self, other: &TypedInstance) -> bool {
        Arc::ptr_eq(&self.node.core, &other.node.core)
    }

    /// Clock value of the last mutation.
    pub fn last_change(&self) -> u64 {
        self.node.core.state.read().last_change
    }

    pub(crate) fn core_addr(&self) -> usize {
        Arc::as_ptr(&self.node.core) as usize
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Payload) -> R) -> R {
        f(&self.node.core.state.read().payload)
    }

    /// Apply `f` under the write lock; `f` reports whether it changed
    /// anything, in which case the change clock advances.
    pub(crate) fn commit<R>(&self, f: impl FnOnce(&mut Payload) -> (R, bool)) -> R {
        let mut state = self.node.core.state.write();
        let (result, changed) = f(&mut state.payload);
        if changed {
            state.last_change = self.node.core.registry.tick();
        }
        result
    }

    pub(crate) fn snapshot(&self) -> Payload {
        self.read(Payload::clone)
    }

    /// Hand a stored entry to a caller, projected if this view is read-only.
    pub(crate) fn expose(&self, value: TypedValue) -> TypedValue {
        if self.node.read_only {
            value.read_only()
        } else {
            value
        }
    }

    /// Nested instances held directly, unprojected.
    pub(crate) fn child_instances(&self) -> Vec<TypedInstance> {
        self.read(|payload| {
            payload
                .values()
                .filter_map(TypedValue::as_instance)
                .cloned()
                .collect()
        })
    }

    pub(crate) fn is_record(&self) -> bool {
        self.family() == TypeFamily::Record
    }
}

impl PartialEq for TypedInstance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TypedInstance {}

impl fmt::Debug for TypedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.read(Payload::len);
        f.debug_struct("TypedInstance")
            .field("type", &self.type_name())
            .field("read_only", &self.node.read_only)
            .field("len", &len)
            .finish()
    }
}
