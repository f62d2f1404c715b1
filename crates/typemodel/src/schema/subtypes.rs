// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic subtype constraints and their resolution.

use super::registry::TypeRegistry;
use super::type_ref::TypeRef;
use crate::value::Input;
use std::fmt;

/// The set of types a generic container accepts for its entries.
#[derive(Clone, Debug)]
pub enum Subtypes {
    /// Exactly one type.
    Single(TypeRef),
    /// Untagged polymorphism, resolved by first structural match.
    Union(Vec<TypeRef>),
    /// Tagged polymorphism: discriminant value -> type.
    Tagged(Vec<(String, TypeRef)>),
}

impl Subtypes {
    pub fn single(ty: &TypeRef) -> Self {
        Self::Single(ty.clone())
    }

    pub fn union<'a>(types: impl IntoIterator<Item = &'a TypeRef>) -> Self {
        Self::Union(types.into_iter().cloned().collect())
    }

    /// Tagged set keyed by each type's own tag.
    pub fn tagged<'a>(types: impl IntoIterator<Item = &'a TypeRef>) -> Self {
        Self::Tagged(
            types
                .into_iter()
                .map(|ty| (ty.tag().to_string(), ty.clone()))
                .collect(),
        )
    }

    /// Tagged set with explicit discriminant values.
    pub fn tagged_with<K: Into<String>>(entries: impl IntoIterator<Item = (K, TypeRef)>) -> Self {
        Self::Tagged(entries.into_iter().map(|(k, ty)| (k.into(), ty)).collect())
    }

    /// Collapse single-member unions.
    pub fn normalize(self) -> Self {
        match self {
            Self::Union(mut types) if types.len() == 1 => Self::Single(types.remove(0)),
            other => other,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Union(types) => types.len(),
            Self::Tagged(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self, Self::Tagged(_))
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &TypeRef> + '_> {
        match self {
            Self::Single(ty) => Box::new(std::iter::once(ty)),
            Self::Union(types) => Box::new(types.iter()),
            Self::Tagged(entries) => Box::new(entries.iter().map(|(_, ty)| ty)),
        }
    }

    /// Candidates registered under `tag`: explicit keys first, then each
    /// candidate's own tag. Several parameterizations of one generic
    /// (`Map<Number>`, `Map<String>`) share a tag.
    pub fn by_tag(&self, tag: &str) -> Vec<&TypeRef> {
        let mut found: Vec<&TypeRef> = match self {
            Self::Tagged(entries) => entries
                .iter()
                .filter(|(key, _)| key == tag)
                .map(|(_, ty)| ty)
                .collect(),
            _ => Vec::new(),
        };
        for ty in self.iter().filter(|ty| ty.tag() == tag) {
            if !found.iter().any(|seen| std::ptr::eq(*seen, ty)) {
                found.push(ty);
            }
        }
        found
    }

    /// Structural equality over candidate references.
    pub fn same(&self, other: &Subtypes) -> bool {
        match (self, other) {
            (Self::Tagged(a), Self::Tagged(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, ta), (kb, tb))| ka == kb && ta.same_type(tb))
            }
            (Self::Tagged(_), _) | (_, Self::Tagged(_)) => false,
            _ => self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.same_type(b)),
        }
    }

    /// Display without the surrounding angle brackets (`User|Address`).
    pub fn unwrapped(&self) -> String {
        match self {
            Self::Tagged(entries) => entries
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            _ => self.iter().map(|ty| ty.to_string()).collect::<Vec<_>>().join("|"),
        }
    }

    /// Pick the candidate matching `value`.
    ///
    /// A discriminant present on plain input selects the first candidate
    /// under that tag that accepts the value; a tagged set with an unknown
    /// tag matches nothing. Otherwise every candidate is first
    /// asked whether the value is already one of its instances, and only then
    /// whether the raw payload is structurally acceptable. With more than one
    /// candidate, a record only matches an object that names one of its
    /// fields.
    pub fn resolve(&self, registry: &TypeRegistry, value: &Input) -> Option<&TypeRef> {
        if let Some(tag) = value.plain_tag(registry.tag_key()) {
            let candidates = self.by_tag(&tag);
            if !candidates.is_empty() {
                return candidates.into_iter().find(|ty| registry.validate(ty, value));
            }
            if self.is_tagged() {
                return None;
            }
        }

        let several = self.len() > 1;
        self.iter()
            .find(|ty| registry.validate_type(ty, value))
            .or_else(|| {
                self.iter().find(|ty| {
                    registry.allow_plain_val(ty, value)
                        && (!several || registry.shares_declared_field(ty, value))
                })
            })
    }
}

impl fmt::Display for Subtypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.unwrapped())
    }
}

impl From<TypeRef> for Subtypes {
    fn from(ty: TypeRef) -> Self {
        Self::Single(ty)
    }
}

impl From<&TypeRef> for Subtypes {
    fn from(ty: &TypeRef) -> Self {
        Self::Single(ty.clone())
    }
}

impl From<Vec<TypeRef>> for Subtypes {
    fn from(types: Vec<TypeRef>) -> Self {
        Self::Union(types).normalize()
    }
}

impl<const N: usize> From<[TypeRef; N]> for Subtypes {
    fn from(types: [TypeRef; N]) -> Self {
        Self::Union(types.into()).normalize()
    }
}

impl From<&[TypeRef]> for Subtypes {
    fn from(types: &[TypeRef]) -> Self {
        Self::Union(types.to_vec()).normalize()
    }
}
