// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! typemodel - typed values over plain JSON data
//!
//! Declare record and container types once in a [`TypeRegistry`], then turn
//! untyped input into live [`TypedInstance`]s that validate on every write,
//! can be projected read-only without copying, and answer "has anything under
//! me changed since the last checkpoint?".
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use typemodel::{Input, TypeRegistry};
//!
//! let mut builder = TypeRegistry::builder();
//! let string = builder.string();
//! let number = builder.number();
//! let user = builder
//!     .define("User", |_| {
//!         vec![
//!             ("name", string.with_default("")),
//!             ("age", number.with_default(10)),
//!         ]
//!     })
//!     .unwrap();
//! let registry = builder.build();
//!
//! let users = registry.map_of(&user);
//! let map = registry
//!     .create(&users, Input::pairs([("a", json!({"name": "x", "age": 1}))]))
//!     .unwrap();
//!
//! map.set("b", json!({"name": "y"})).unwrap();
//! let b = map.get("b").and_then(|v| v.into_instance()).unwrap();
//! assert_eq!(b.get("age").unwrap().as_f64(), Some(10.0));
//! assert!(map.delete("a"));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`schema`]: descriptors, type references, subtype resolution, the registry
//! - [`value`]: instances, the validate/wrap pipeline, containers, invalidation
//! - [`diagnostics`]: severity-leveled mismatch reporting
//! - [`config`]: runtime configuration owned by the registry

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod schema;
pub mod value;

pub use config::{InvalidationMode, RuntimeConfig, TYPE_TAG};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticKind, DiagnosticSink, ErrorContext, LogSink,
    Mailbox, Severity, SilentSink,
};
pub use error::{ModelError, Result};
pub use schema::{
    Capabilities, DefinitionError, FieldDescriptor, GenericKind, RecordBuilder, RegistryBuilder,
    ScalarKind, Subtypes, TypeDescriptor, TypeFamily, TypeId, TypeKind, TypeRef, TypeRegistry,
};
pub use value::{Input, TypedInstance, TypedValue};
