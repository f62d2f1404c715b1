// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Severity-leveled mismatch reporting.
//!
//! Every validation failure is described by a [`Diagnostic`] and posted
//! through the registry's [`Mailbox`]. The mailbox hands it to a
//! [`DiagnosticSink`] and then either raises (`Severity::Error`) or lets the
//! caller continue (`Severity::Warn`).

mod context;

pub use context::ErrorContext;

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a posted diagnostic affects the current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Record and continue; the offending entry is skipped.
    Warn,
    /// Abort the current operation.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Definition,
    TypeMismatch,
    KeyMismatch,
    MalformedPayload,
}

/// One structured validation failure.
///
/// For `Definition` diagnostics `expected` carries the definition message
/// and `actual` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub entry_point: String,
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Diagnostic {
    pub fn definition(
        entry_point: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::Definition,
            entry_point: entry_point.into(),
            path: path.into(),
            expected: message.into(),
            actual: String::new(),
        }
    }

    pub fn type_mismatch(
        entry_point: impl Into<String>,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::TypeMismatch,
            entry_point: entry_point.into(),
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn key_mismatch(
        entry_point: impl Into<String>,
        path: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::KeyMismatch,
            entry_point: entry_point.into(),
            path: path.into(),
            expected: "string".to_string(),
            actual: actual.into(),
        }
    }

    pub fn malformed(
        entry_point: impl Into<String>,
        path: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::MalformedPayload,
            entry_point: entry_point.into(),
            path: path.into(),
            expected: "typed instance, pairs or object".to_string(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Definition => {
                write!(f, "{}: \"{}\" {}", self.entry_point, self.path, self.expected)
            }
            DiagnosticKind::TypeMismatch => write!(
                f,
                "{}: \"{}\" expected type <{}> for value but got {}",
                self.entry_point, self.path, self.expected, self.actual
            ),
            DiagnosticKind::KeyMismatch => write!(
                f,
                "{}: \"{}\" expected type <{}> for key but got {}",
                self.entry_point, self.path, self.expected, self.actual
            ),
            DiagnosticKind::MalformedPayload => write!(
                f,
                "{}: \"{}\" unknown or incompatible value: {}",
                self.entry_point, self.path, self.actual
            ),
        }
    }
}

/// Destination for posted diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, severity: Severity, diagnostic: &Diagnostic);
}

/// Routes diagnostics to the `log` facade. Default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, severity: Severity, diagnostic: &Diagnostic) {
        match severity {
            Severity::Error => log::error!("[typemodel] {}", diagnostic),
            Severity::Warn => log::warn!("[typemodel] {}", diagnostic),
        }
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn record(&self, _severity: Severity, _diagnostic: &Diagnostic) {}
}

/// Keeps every posted diagnostic until drained, logging as it goes.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    reports: parking_lot::RwLock<Vec<(Severity, Diagnostic)>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain_reports(&self) -> Vec<(Severity, Diagnostic)> {
        let mut reports = self.reports.write();
        std::mem::take(&mut *reports)
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn record(&self, severity: Severity, diagnostic: &Diagnostic) {
        LogSink.record(severity, diagnostic);
        self.reports.write().push((severity, diagnostic.clone()));
    }
}

/// Posts diagnostics to a sink and turns `Error` severity into a raised error.
#[derive(Clone)]
pub struct Mailbox {
    sink: Arc<dyn DiagnosticSink>,
}

impl Mailbox {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn post(&self, severity: Severity, diagnostic: Diagnostic) -> Result<()> {
        self.sink.record(severity, &diagnostic);
        match severity {
            Severity::Error => Err(ModelError::from(diagnostic)),
            Severity::Warn => Ok(()),
        }
    }

    pub fn warn(&self, diagnostic: Diagnostic) {
        self.sink.record(Severity::Warn, &diagnostic);
    }

    pub fn error(&self, diagnostic: Diagnostic) -> ModelError {
        self.sink.record(Severity::Error, &diagnostic);
        ModelError::from(diagnostic)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_post_raises() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mailbox = Mailbox::new(collector.clone());

        let diag = Diagnostic::type_mismatch("Map set error", "Map<User>[a]", "User", "42");
        let err = mailbox.post(Severity::Error, diag.clone()).unwrap_err();

        assert_eq!(err, ModelError::TypeMismatch(diag));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_warn_post_continues() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mailbox = Mailbox::new(collector.clone());

        let diag = Diagnostic::key_mismatch("Map constructor error", "Map<Number>", "1");
        assert!(mailbox.post(Severity::Warn, diag).is_ok());

        let reports = collector.drain_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, Severity::Warn);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_definition_diagnostic_maps_to_definition_error() {
        let diag = Diagnostic::definition("Map constructor error", "Map", "Missing types");
        match ModelError::from(diag) {
            ModelError::Definition { path, message } => {
                assert_eq!(path, "Map");
                assert_eq!(message, "Missing types");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_display_formats() {
        let diag = Diagnostic::type_mismatch("Map set error", "Map<User>[a]", "User", "42");
        assert_eq!(
            diag.to_string(),
            "Map set error: \"Map<User>[a]\" expected type <User> for value but got 42"
        );
        let key = Diagnostic::key_mismatch("Map get error", "Map<User>", "1");
        assert!(key.to_string().contains("for key but got 1"));
    }
}
