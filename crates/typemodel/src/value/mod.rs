// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed values.
//!
//! - **Input**: raw data in any accepted shape
//! - **TypedInstance**: a record, map or list built by the wrap pipeline
//! - **TypedValue**: one stored entry (scalar leaf or nested instance)
//!
//! Instances are mutable by default. [`TypedInstance::as_read_only`] returns
//! a cached projection over the same payload whose mutators do nothing and
//! whose accessors project nested instances in turn.

mod accessors;
mod export;
mod indexed;
mod input;
mod instance;
mod invalidation;
mod keyed;
mod merge;
mod typed;
mod wrap;

pub use accessors::check_record_fields;
pub use input::Input;
pub use instance::TypedInstance;
pub use typed::TypedValue;
