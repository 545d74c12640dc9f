// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compile and load diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A recoverable problem found while parsing, resolving or importing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    /// Where the source came from (file path, package path, or none for inline).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 1-based line; 0 when no position applies.
    #[serde(default)]
    pub line: u32,
    /// 1-based column; 0 when no position applies.
    #[serde(default)]
    pub column: u32,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            line: 0,
            column: 0,
        }
    }

    pub fn at(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            source: None,
            line: pos.line,
            column: pos.column,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        if self.source.is_none() {
            self.source = Some(source.into());
        }
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}:", source)?;
        }
        if self.line > 0 {
            write!(f, "{}:{}:", self.line, self.column)?;
        }
        if self.source.is_some() || self.line > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Source position, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

/// Encode diagnostics for a wire message buffer.
pub fn to_json(diagnostics: &[Diagnostic]) -> Vec<u8> {
    serde_json::to_vec(diagnostics).unwrap_or_else(|_| b"[]".to_vec())
}

/// Decode diagnostics from a wire message buffer.
///
/// Text that is not a JSON diagnostic list becomes a single message.
pub fn from_json(bytes: &[u8]) -> Vec<Diagnostic> {
    if bytes.is_empty() {
        return Vec::new();
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| vec![Diagnostic::new(String::from_utf8_lossy(bytes))])
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
