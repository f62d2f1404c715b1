// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime configuration owned by a [`crate::TypeRegistry`].

use crate::diagnostics::Severity;
use serde::{Deserialize, Serialize};

/// Reserved discriminant key carrying a type's tag in plain data.
pub const TYPE_TAG: &str = "_type";

/// Env var selecting the invalidation mode (`live` or `latched`).
pub const INVALIDATION_ENV: &str = "TYPEMODEL_INVALIDATION";

/// Env var overriding the discriminant key.
pub const TAG_KEY_ENV: &str = "TYPEMODEL_TAG_KEY";

/// How `is_invalidated` answers repeated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationMode {
    /// Re-walk the tree on every call.
    #[default]
    Live,
    /// Remember the first answer until `reset_validation_check` or
    /// `revalidate` clears it.
    Latched,
}

impl InvalidationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Some(Self::Live),
            "latched" | "memo" => Some(Self::Latched),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Discriminant key read from input and written by tagged export.
    pub tag_key: String,
    pub invalidation: InvalidationMode,
    /// Severity for per-entry mismatches during `create`.
    pub construction_level: Severity,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tag_key: TYPE_TAG.to_string(),
            invalidation: InvalidationMode::Live,
            construction_level: Severity::Error,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `TYPEMODEL_INVALIDATION` / `TYPEMODEL_TAG_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(INVALIDATION_ENV) {
            match InvalidationMode::parse(&raw) {
                Some(mode) => config.invalidation = mode,
                None => log::warn!(
                    "[typemodel] ignoring {}={:?} (expected 'live' or 'latched')",
                    INVALIDATION_ENV,
                    raw
                ),
            }
        }

        if let Ok(key) = std::env::var(TAG_KEY_ENV) {
            if key.is_empty() {
                log::warn!("[typemodel] ignoring empty {}", TAG_KEY_ENV);
            } else {
                config.tag_key = key;
            }
        }

        config
    }

    pub fn with_invalidation(mut self, mode: InvalidationMode) -> Self {
        self.invalidation = mode;
        self
    }

    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    pub fn with_construction_level(mut self, level: Severity) -> Self {
        self.construction_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.tag_key, "_type");
        assert_eq!(config.invalidation, InvalidationMode::Live);
        assert_eq!(config.construction_level, Severity::Error);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(InvalidationMode::parse("Latched"), Some(InvalidationMode::Latched));
        assert_eq!(InvalidationMode::parse(" live "), Some(InvalidationMode::Live));
        assert_eq!(InvalidationMode::parse("eager"), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"invalidation": "latched"}"#).unwrap();
        assert_eq!(config.invalidation, InvalidationMode::Latched);
        assert_eq!(config.tag_key, TYPE_TAG);
    }
}
