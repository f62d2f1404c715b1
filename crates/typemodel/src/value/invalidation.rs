// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Change invalidation.
//!
//! Every mutation stamps the instance with the registry clock. An instance is
//! invalidated when its own stamp is newer than its last checkpoint, or when
//! any nested instance is. The check is pull-based: nothing is notified on
//! mutation, the tree is walked when asked.
//!
//! In [`InvalidationMode::Latched`] the first answer is memoised per
//! instance until [`TypedInstance::reset_validation_check`] or
//! [`TypedInstance::revalidate`] clears it.

use super::instance::TypedInstance;
use crate::config::InvalidationMode;
use std::collections::{HashMap, HashSet};

impl TypedInstance {
    /// Has this instance, or anything beneath it, changed since the last
    /// [`Self::revalidate`]?
    pub fn is_invalidated(&self) -> bool {
        self.invalidated_within(&mut HashMap::new())
    }

    /// Establish a new checkpoint here and in every nested instance.
    pub fn revalidate(&self) {
        let now = self.registry().now();
        self.walk(&mut HashSet::new(), &mut |instance| {
            let mut state = instance.core().state.write();
            state.checkpoint = now;
            state.latched = None;
        });
    }

    /// Forget memoised answers here and beneath, so a later change is
    /// reported again. Does not move the checkpoint.
    pub fn reset_validation_check(&self) {
        self.walk(&mut HashSet::new(), &mut |instance| {
            instance.core().state.write().latched = None;
        });
    }

    /// Visit each nested instance held directly (scalar entries are skipped).
    /// Read-only views hand out read-only children.
    pub fn for_each_dirtyable<F>(&self, mut visit: F)
    where
        F: FnMut(&TypedInstance),
    {
        for child in self.child_instances() {
            visit(&self.expose_instance(child));
        }
    }

    fn expose_instance(&self, child: TypedInstance) -> TypedInstance {
        if self.is_read_only() {
            child.as_read_only()
        } else {
            child
        }
    }

    /// `seen` holds answers already computed during this walk; an entry
    /// still being computed (a cycle back to an ancestor) reads as `false`.
    fn invalidated_within(&self, seen: &mut HashMap<usize, bool>) -> bool {
        let addr = self.core_addr();
        if let Some(answer) = seen.get(&addr) {
            return *answer;
        }
        seen.insert(addr, false);
        let latched_mode = self.registry().config().invalidation == InvalidationMode::Latched;

        let own = {
            let state = self.core().state.read();
            if latched_mode {
                if let Some(answer) = state.latched {
                    log::trace!("[typemodel] latched invalidation answer for {}", self.type_name());
                    seen.insert(addr, answer);
                    return answer;
                }
            }
            state.last_change > state.checkpoint
        };

        let mut answer = own;
        for child in self.child_instances() {
            if child.invalidated_within(seen) {
                answer = true;
            }
        }

        seen.insert(addr, answer);
        if latched_mode {
            self.core().state.write().latched = Some(answer);
        }
        answer
    }

    /// Depth-first over this instance and every reachable nested instance,
    /// each payload visited once.
    fn walk(&self, seen: &mut HashSet<usize>, apply: &mut dyn FnMut(&TypedInstance)) {
        if !seen.insert(self.core_addr()) {
            return;
        }
        apply(self);
        for child in self.child_instances() {
            child.walk(seen, apply);
        }
    }
}
