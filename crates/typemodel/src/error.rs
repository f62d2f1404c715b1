// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate error type.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A type was declared incorrectly (e.g. a generic without subtypes).
    #[error("definition error at \"{path}\": {message}")]
    Definition { path: String, message: String },

    /// A value did not satisfy any candidate type.
    #[error("{0}")]
    TypeMismatch(Diagnostic),

    /// A container key was not a string or is reserved.
    #[error("{0}")]
    KeyMismatch(Diagnostic),

    /// Input of a shape the pipeline cannot interpret.
    #[error("{0}")]
    MalformedPayload(Diagnostic),

    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("{operation} is not supported on {type_name}")]
    InvalidOperation { type_name: String, operation: String },

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl ModelError {
    pub(crate) fn invalid_operation(type_name: impl Into<String>, operation: &str) -> Self {
        Self::InvalidOperation {
            type_name: type_name.into(),
            operation: operation.to_string(),
        }
    }

    /// The diagnostic behind a mismatch error, if this is one.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::TypeMismatch(d) | Self::KeyMismatch(d) | Self::MalformedPayload(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Diagnostic> for ModelError {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.kind {
            DiagnosticKind::Definition => Self::Definition {
                path: diagnostic.path,
                message: diagnostic.expected,
            },
            DiagnosticKind::TypeMismatch => Self::TypeMismatch(diagnostic),
            DiagnosticKind::KeyMismatch => Self::KeyMismatch(diagnostic),
            DiagnosticKind::MalformedPayload => Self::MalformedPayload(diagnostic),
        }
    }
}
