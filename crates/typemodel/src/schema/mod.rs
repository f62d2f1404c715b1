// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type definitions.
//!
//! - **TypeDescriptor**: the registered definition of a type (name, tag, shape)
//! - **TypeRef**: a handle to a descriptor plus per-use options (default,
//!   validator, nullability, generic subtypes)
//! - **Subtypes**: the constraint a generic container places on its entries
//! - **TypeRegistry**: owns descriptors, config and the diagnostics mailbox

mod builder;
mod descriptor;
mod registry;
mod subtypes;
mod type_ref;

pub use builder::RecordBuilder;
pub use descriptor::{
    Capabilities, DefaultsFn, FieldDescriptor, GenericKind, ScalarKind, TestFn, TypeDescriptor,
    TypeFamily, TypeId, TypeKind,
};
pub use registry::{RegistryBuilder, TypeRegistry};
pub use subtypes::Subtypes;
pub use type_ref::{DefinitionError, TypeRef, Validator};
