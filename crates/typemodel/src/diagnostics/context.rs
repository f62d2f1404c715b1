// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Diagnostic, Mailbox, Severity};
use crate::error::Result;

/// Per-call diagnostic carrier.
///
/// The path grows as validation descends (`Map<User>[a].age`) and shrinks on
/// the way back up; the last diagnostic posted through it is kept so lenient
/// callers can surface it.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    entry_point: String,
    level: Severity,
    path: String,
    last: Option<Diagnostic>,
}

impl ErrorContext {
    pub fn new(entry_point: impl Into<String>, level: Severity, path: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            level,
            path: path.into(),
            last: None,
        }
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn last_diagnostic(&self) -> Option<&Diagnostic> {
        self.last.as_ref()
    }

    pub fn into_last_diagnostic(self) -> Option<Diagnostic> {
        self.last
    }

    /// Append a path segment; returns the mark to hand back to [`Self::leave`].
    pub(crate) fn enter(&mut self, segment: &str) -> usize {
        let mark = self.path.len();
        self.path.push_str(segment);
        mark
    }

    pub(crate) fn leave(&mut self, mark: usize) {
        self.path.truncate(mark);
    }

    pub(crate) fn mismatch(&self, expected: impl Into<String>, actual: impl Into<String>) -> Diagnostic {
        Diagnostic::type_mismatch(&self.entry_point, &self.path, expected, actual)
    }

    pub(crate) fn key_mismatch(&self, actual: impl Into<String>) -> Diagnostic {
        Diagnostic::key_mismatch(&self.entry_point, &self.path, actual)
    }

    pub(crate) fn malformed(&self, actual: impl Into<String>) -> Diagnostic {
        Diagnostic::malformed(&self.entry_point, &self.path, actual)
    }

    pub(crate) fn definition(&self, path: &str, message: &str) -> Diagnostic {
        Diagnostic::definition(&self.entry_point, path, message)
    }

    /// Post at the context's level.
    pub(crate) fn report(&mut self, mailbox: &Mailbox, diagnostic: Diagnostic) -> Result<()> {
        self.report_at(mailbox, self.level, diagnostic)
    }

    pub(crate) fn report_at(
        &mut self,
        mailbox: &Mailbox,
        severity: Severity,
        diagnostic: Diagnostic,
    ) -> Result<()> {
        self.last = Some(diagnostic.clone());
        mailbox.post(severity, diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SilentSink;
    use std::sync::Arc;

    #[test]
    fn test_path_segments_nest_and_unwind() {
        let mut ctx = ErrorContext::new("Map constructor error", Severity::Error, "Map<User>");
        let outer = ctx.enter("[a]");
        let inner = ctx.enter(".age");
        assert_eq!(ctx.path(), "Map<User>[a].age");
        ctx.leave(inner);
        assert_eq!(ctx.path(), "Map<User>[a]");
        ctx.leave(outer);
        assert_eq!(ctx.path(), "Map<User>");
    }

    #[test]
    fn test_report_keeps_last_diagnostic() {
        let mailbox = Mailbox::new(Arc::new(SilentSink));
        let mut ctx = ErrorContext::new("Map constructor error", Severity::Warn, "Map<Number>");

        let first = ctx.mismatch("Number", "\"a\"");
        let second = ctx.mismatch("Number", "true");
        ctx.report(&mailbox, first).unwrap();
        ctx.report(&mailbox, second.clone()).unwrap();

        assert_eq!(ctx.last_diagnostic(), Some(&second));
    }
}
