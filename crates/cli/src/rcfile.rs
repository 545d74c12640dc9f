// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rc file: per-user engine settings in TOML.
//!
//! ```toml
//! version = 1
//! libpath = ["~/rpl", "/usr/share/quarry/rpl"]
//! alloc_limit = 16384
//! load = ["local.rpl"]
//! import = ["net", "date as d"]
//!
//! [colors]
//! "net.ipv4" = "magenta"
//! ```
//!
//! Unknown keys are warned about and ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Pos};
use crate::engine::Engine;

/// Rc file name inside the home directory.
pub const RC_FILE_NAME: &str = ".quarryrc";

/// Supported rc file version.
pub const SUPPORTED_VERSION: i64 = 1;

/// `libpath` as either one `:`-separated string or a list of directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibpathSetting {
    Joined(String),
    List(Vec<String>),
}

impl LibpathSetting {
    pub fn joined(&self) -> String {
        match self {
            LibpathSetting::Joined(path) => path.clone(),
            LibpathSetting::List(dirs) => dirs.join(":"),
        }
    }
}

/// Parsed rc file settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RcOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libpath: Option<LibpathSetting>,

    /// KB; 0 for unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alloc_limit: Option<i64>,

    /// Files to load, relative to the rc file's directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load: Vec<String>,

    /// Packages to import: `"path"` or `"path as alias"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub import: Vec<String>,

    /// Capture type (or package) to color name or 256-color code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, String>,

    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    unknown: BTreeMap<String, toml::Value>,
}

/// Result of reading an rc file.
#[derive(Debug, Clone, PartialEq)]
pub enum RcFile {
    Missing,
    Invalid(Vec<Diagnostic>),
    Options(RcOptions),
}

/// Result of executing an rc file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcOutcome {
    Missing,
    /// The file was unreadable, or some settings failed. Settings that
    /// succeeded stay applied.
    Failed(Vec<Diagnostic>),
    Applied,
}

/// `$HOME/.quarryrc`, if `HOME` is set.
pub fn default_rc_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(RC_FILE_NAME))
}

/// Parse rc file content. `label` names the file in diagnostics.
pub fn parse(content: &str, label: &str) -> Result<RcOptions, Vec<Diagnostic>> {
    let mut options: RcOptions = toml::from_str(content).map_err(|err| {
        let pos = err
            .span()
            .map(|span| position(content, span.start))
            .unwrap_or_default();
        vec![Diagnostic::at(err.message().trim_end(), pos).with_source(label)]
    })?;

    if let Some(version) = options.version
        && version != SUPPORTED_VERSION
    {
        return Err(vec![
            Diagnostic::new(format!(
                "unsupported rc file version {version} (supported: {SUPPORTED_VERSION})"
            ))
            .with_source(label),
        ]);
    }
    for key in std::mem::take(&mut options.unknown).keys() {
        tracing::warn!(file = label, key = %key, "unrecognized rc file key (ignored)");
    }
    Ok(options)
}

/// Split an import entry into path and optional alias.
pub fn split_import(entry: &str) -> (&str, Option<&str>) {
    let mut words = entry.split_whitespace();
    match (words.next(), words.next(), words.next(), words.next()) {
        (Some(path), Some("as"), Some(alias), None) => (path, Some(alias)),
        _ => (entry.trim(), None),
    }
}

fn position(content: &str, offset: usize) -> Pos {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    Pos {
        line: u32::try_from(line).unwrap_or(u32::MAX),
        column: u32::try_from(column).unwrap_or(u32::MAX),
    }
}

impl Engine {
    /// Read and parse an rc file (default `$HOME/.quarryrc`).
    pub fn read_rc_file(&self, path: Option<&Path>) -> RcFile {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_rc_path) else {
            return RcFile::Missing;
        };
        let label = path.display().to_string();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return RcFile::Missing,
            Err(err) => {
                return RcFile::Invalid(vec![Diagnostic::new(format!(
                    "cannot read {label}: {err}"
                ))]);
            }
        };
        match parse(&content, &label) {
            Ok(options) => RcFile::Options(options),
            Err(messages) => RcFile::Invalid(messages),
        }
    }

    /// Read an rc file and apply every setting in it.
    ///
    /// Order: libpath, alloc limit, colors, imports, then loads.
    pub fn execute_rc_file(&mut self, path: Option<&Path>) -> RcOutcome {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_rc_path) else {
            return RcOutcome::Missing;
        };
        let options = match self.read_rc_file(Some(&path)) {
            RcFile::Missing => return RcOutcome::Missing,
            RcFile::Invalid(messages) => return RcOutcome::Failed(messages),
            RcFile::Options(options) => options,
        };
        let label = path.display().to_string();
        let base = path.parent().unwrap_or(Path::new("."));
        let failures = self.apply_rc_options(&options, base, &label);
        tracing::debug!(file = %label, failures = failures.len(), "rc file executed");
        if failures.is_empty() {
            RcOutcome::Applied
        } else {
            RcOutcome::Failed(failures)
        }
    }

    fn apply_rc_options(&mut self, options: &RcOptions, base: &Path, label: &str) -> Vec<Diagnostic> {
        let mut failures = Vec::new();
        let mut fail = |message: String| failures.push(Diagnostic::new(message).with_source(label));

        if let Some(libpath) = &options.libpath {
            self.set_libpath(&libpath.joined());
        }
        if let Some(limit) = options.alloc_limit {
            let applied = u32::try_from(limit)
                .map_err(|_| format!("alloc_limit out of range: {limit}"))
                .and_then(|kb| self.set_alloc_limit(kb).map_err(|e| e.to_string()));
            if let Err(message) = applied {
                fail(message);
            }
        }
        for (kind, color) in &options.colors {
            if let Err(message) = self.palette_mut().set(kind, color) {
                fail(format!("colors.{kind}: {message}"));
            }
        }
        let mut reports = Vec::new();
        for entry in &options.import {
            let (path, alias) = split_import(entry);
            reports.push(self.import(path, alias));
        }
        for file in &options.load {
            reports.push(self.load_file(&base.join(file)));
        }
        failures.extend(
            reports
                .into_iter()
                .filter(|r| !r.ok)
                .flat_map(|r| r.messages),
        );
        failures
    }
}

#[cfg(test)]
#[path = "rcfile_tests.rs"]
mod tests;
