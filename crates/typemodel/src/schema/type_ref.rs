// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type references: a descriptor identity plus per-use options.

use super::descriptor::{GenericKind, TypeFamily, TypeId};
use super::subtypes::Subtypes;
use crate::error::ModelError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A type declared incorrectly, recorded when the reference is built and
/// raised on every construction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionError {
    pub path: String,
    pub message: String,
}

impl DefinitionError {
    fn missing(kind: GenericKind) -> Self {
        Self {
            path: kind.name().to_string(),
            message: format!(
                "Missing types for {}. Use {}<SomeType>",
                kind.noun(),
                kind.name()
            ),
        }
    }

    fn too_many(kind: GenericKind, args: &[Subtypes]) -> Self {
        let listed: Vec<String> = args.iter().map(Subtypes::unwrapped).collect();
        Self {
            path: format!("{}<{}>", kind.name(), listed.join(",")),
            message: format!(
                "Too many types for {} ({}). Use {}<SomeType>",
                kind.noun(),
                args.len(),
                kind.name()
            ),
        }
    }

    fn untyped(kind: GenericKind) -> Self {
        Self {
            path: kind.name().to_string(),
            message: format!(
                "Untyped {}s are not supported please state types of key and value in the format {}<SomeType>",
                kind.name(),
                kind.name()
            ),
        }
    }

    fn not_generic(name: &str) -> Self {
        Self {
            path: name.to_string(),
            message: format!("{} does not take type arguments", name),
        }
    }

    fn nested(self, outer: &str) -> Self {
        Self {
            path: format!("{}<{}>", outer, self.path),
            message: self.message,
        }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\": {}", self.path, self.message)
    }
}

impl From<DefinitionError> for ModelError {
    fn from(err: DefinitionError) -> Self {
        ModelError::Definition {
            path: err.path,
            message: err.message,
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct TypeOptions {
    pub(crate) default: Option<Value>,
    pub(crate) validator: Option<Validator>,
    pub(crate) nullable: bool,
    pub(crate) subtypes: Option<Subtypes>,
    pub(crate) definition_error: Option<DefinitionError>,
}

/// Handle to a registered descriptor, cheap to clone.
///
/// Option setters never mutate the receiver; they return a new reference
/// bound to the same descriptor.
#[derive(Clone)]
pub struct TypeRef {
    id: TypeId,
    family: TypeFamily,
    name: Arc<str>,
    tag: Arc<str>,
    options: Arc<TypeOptions>,
}

impl TypeRef {
    pub(crate) fn new(id: TypeId, family: TypeFamily, name: &str, tag: &str) -> Self {
        Self {
            id,
            family,
            name: Arc::from(name),
            tag: Arc::from(tag),
            options: Arc::new(TypeOptions::default()),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn family(&self) -> TypeFamily {
        self.family
    }

    /// Descriptor display name, without subtypes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_nullable(&self) -> bool {
        self.options.nullable
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.family, TypeFamily::Generic(_))
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.options.default.as_ref()
    }

    pub fn subtypes(&self) -> Option<&Subtypes> {
        self.options.subtypes.as_ref()
    }

    /// The error recorded on this reference itself.
    pub fn definition_error(&self) -> Option<&DefinitionError> {
        self.options.definition_error.as_ref()
    }

    /// First definition error found on this reference or any generic
    /// argument beneath it.
    pub fn pending_definition_error(&self) -> Option<DefinitionError> {
        if let Some(err) = &self.options.definition_error {
            return Some(err.clone());
        }
        let TypeFamily::Generic(kind) = self.family else {
            return None;
        };
        let Some(subtypes) = &self.options.subtypes else {
            return Some(DefinitionError::untyped(kind));
        };
        subtypes
            .iter()
            .find_map(|candidate| candidate.pending_definition_error())
            .map(|err| err.nested(&self.name))
    }

    fn with_options(&self, update: impl FnOnce(&mut TypeOptions)) -> Self {
        let mut options = (*self.options).clone();
        update(&mut options);
        Self {
            options: Arc::new(options),
            ..self.clone()
        }
    }

    /// Same type, pre-bound to a default raw value.
    pub fn with_default(&self, default: impl Into<Value>) -> Self {
        let default = default.into();
        self.with_options(|o| o.default = Some(default))
    }

    /// Same type with an extra predicate on scalar values.
    pub fn with_validator<F>(&self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.with_options(|o| o.validator = Some(Arc::new(validator)))
    }

    /// Same type, also accepting `null`.
    pub fn nullable(&self) -> Self {
        self.with_options(|o| o.nullable = true)
    }

    /// Parameterize a generic with one subtype constraint.
    pub fn of(&self, subtypes: impl Into<Subtypes>) -> Self {
        self.of_args(vec![subtypes.into()])
    }

    /// Parameterize a generic from an argument list.
    ///
    /// Arity errors are recorded on the returned reference rather than
    /// returned, so they surface on every construction attempt.
    pub fn of_args(&self, mut args: Vec<Subtypes>) -> Self {
        let kind = match self.family {
            TypeFamily::Generic(kind) => kind,
            _ => {
                let err = DefinitionError::not_generic(&self.name);
                return self.with_options(|o| o.definition_error = Some(err));
            }
        };

        match args.len() {
            0 => self.with_options(|o| o.definition_error = Some(DefinitionError::missing(kind))),
            1 => {
                let subtypes = args.remove(0).normalize();
                if subtypes.is_empty() {
                    return self
                        .with_options(|o| o.definition_error = Some(DefinitionError::missing(kind)));
                }
                self.with_options(|o| {
                    o.subtypes = Some(subtypes);
                    o.definition_error = None;
                })
            }
            _ => {
                let err = DefinitionError::too_many(kind, &args);
                let first = args.remove(0).normalize();
                self.with_options(|o| {
                    o.subtypes = Some(first);
                    o.definition_error = Some(err);
                })
            }
        }
    }

    /// Same descriptor and, for generics, the same subtype constraint.
    pub fn same_type(&self, other: &TypeRef) -> bool {
        if self.id != other.id {
            return false;
        }
        match (self.subtypes(), other.subtypes()) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn validator_accepts(&self, value: &Value) -> bool {
        self.options.validator.as_ref().map_or(true, |check| check(value))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subtypes() {
            Some(subtypes) => write!(f, "{}{}", self.name, subtypes),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("id", &self.id)
            .field("type", &self.to_string())
            .field("nullable", &self.options.nullable)
            .field("default", &self.options.default)
            .field("definition_error", &self.options.definition_error)
            .finish()
    }
}
