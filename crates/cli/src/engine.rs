// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: one isolated namespace, pattern table, and allocation
//! budget.
//!
//! Engine operations report semantic outcomes (no match, invalid pattern,
//! compile errors) as plain data. [`Fault`] is reserved for mechanical
//! failures the caller cannot act on.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::encoder::{EncodeError, Encoded, Encoder, Encoding, Palette};
use crate::loader::{LoadReport, Namespace, Search};
use crate::pattern::{Limits, Program, TraceStyle, Tracer, vm};
use crate::runtime::{Runtime, RuntimeError, join_libpath, split_libpath};
use crate::table::{PatternId, PatternTable};

/// Smallest non-zero allocation limit, in KB.
pub const MIN_ALLOC_LIMIT_KB: u32 = 8192;

/// A mechanical failure inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("encoder '{encoder}' failed: {source}")]
    Encode {
        encoder: &'static str,
        #[source]
        source: EncodeError,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// What a match produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoMatch,
    /// Matched, and the encoder produces no data.
    BooleanMatch,
    InvalidEncoder,
    InvalidPattern,
    Payload(Vec<u8>),
}

impl From<Encoded> for Outcome {
    fn from(encoded: Encoded) -> Self {
        match encoded {
            Encoded::Boolean => Outcome::BooleanMatch,
            Encoded::Bytes(bytes) => Outcome::Payload(bytes),
        }
    }
}

/// Result of one match call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub outcome: Outcome,
    /// Input bytes after the match (after the start position on no match).
    pub leftover: usize,
    /// The match was abandoned on a resource limit.
    pub abend: bool,
    /// Microseconds spent in the whole call.
    pub total_time: u64,
    /// Microseconds spent matching.
    pub match_time: u64,
}

impl MatchReport {
    fn rejected(outcome: Outcome, started: Instant) -> Self {
        Self {
            outcome,
            leftover: 0,
            abend: false,
            total_time: micros(started),
            match_time: 0,
        }
    }

    pub fn matched(&self) -> bool {
        matches!(self.outcome, Outcome::BooleanMatch | Outcome::Payload(_))
    }
}

/// Result of one trace call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    InvalidPattern,
    InvalidStyle,
    Traced { matched: bool, trace: Vec<u8> },
}

/// Result of compiling an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub id: Option<PatternId>,
    pub messages: Vec<Diagnostic>,
}

/// One configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
    pub description: String,
}

/// Snapshot of an engine's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(pub Vec<ConfigEntry>);

impl Config {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

/// One pattern-matching engine.
#[derive(Debug)]
pub struct Engine {
    runtime: &'static Runtime,
    namespace: Namespace,
    patterns: PatternTable,
    libpath: Vec<PathBuf>,
    libpath_source: &'static str,
    /// KB; 0 means unlimited.
    alloc_limit: u32,
    palette: Palette,
}

impl Engine {
    /// Create an engine, initializing the process runtime on first use.
    pub fn new(home: Option<&Path>) -> Result<Self, Fault> {
        let runtime = Runtime::get_or_init(home)?;
        tracing::debug!(home = ?runtime.home(), "engine created");
        Ok(Self {
            runtime,
            namespace: Namespace::new(),
            patterns: PatternTable::new(),
            libpath: runtime.default_libpath().to_vec(),
            libpath_source: runtime.libpath_source().as_str(),
            alloc_limit: 0,
            palette: Palette::default(),
        })
    }

    pub fn runtime(&self) -> &'static Runtime {
        self.runtime
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Release every pattern; returns how many were live.
    pub fn finalize(&mut self) -> usize {
        let released = self.patterns.clear();
        tracing::debug!(released, "engine finalized");
        released
    }

    pub fn config(&self) -> Config {
        let rt = self.runtime;
        let (limit, usage) = self.alloc_limit();
        let entry = |name: &str, value: String, description: &str| ConfigEntry {
            name: name.to_string(),
            value,
            description: description.to_string(),
        };
        Config(vec![
            entry("version", env!("CARGO_PKG_VERSION").to_string(), "quarry version"),
            entry(
                "home",
                rt.home().map(|h| h.display().to_string()).unwrap_or_default(),
                "runtime home directory",
            ),
            entry("libpath", self.libpath(), "directories searched by import and load_file"),
            entry("libpath_source", self.libpath_source.to_string(), "where the libpath was set"),
            entry("alloc_limit", limit.to_string(), "allocation limit in KB (0 = unlimited)"),
            entry("alloc_usage", usage.to_string(), "current allocation in KB"),
            entry("patterns", self.patterns.len().to_string(), "live compiled patterns"),
            entry("encoders", join(rt.encoders().names()), "output encoders"),
            entry("trace_styles", join(rt.trace_styles().map(TraceStyle::name)), "trace styles"),
            entry("packages", join(rt.library().names()), "built-in packages"),
        ])
    }

    pub fn libpath(&self) -> String {
        join_libpath(&self.libpath)
    }

    pub fn libpath_dirs(&self) -> &[PathBuf] {
        &self.libpath
    }

    pub fn set_libpath(&mut self, path: &str) {
        self.libpath = split_libpath(path);
        self.libpath_source = "set";
        tracing::debug!(libpath = path, "libpath set");
    }

    /// `(limit, usage)` in KB.
    pub fn alloc_limit(&self) -> (u32, u32) {
        let usage = self.usage_bytes().div_ceil(1024);
        (self.alloc_limit, u32::try_from(usage).unwrap_or(u32::MAX))
    }

    /// Set the allocation limit in KB: 0 for unlimited, else at least
    /// [`MIN_ALLOC_LIMIT_KB`].
    pub fn set_alloc_limit(&mut self, kb: u32) -> Result<(), Fault> {
        if kb != 0 && kb < MIN_ALLOC_LIMIT_KB {
            return Err(Fault::InvalidArgument(format!(
                "allocation limit must be 0 or at least {MIN_ALLOC_LIMIT_KB} KB, got {kb}"
            )));
        }
        self.alloc_limit = kb;
        Ok(())
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    fn usage_bytes(&self) -> usize {
        self.namespace.footprint() + self.patterns.footprint()
    }

    fn limits(&self) -> Limits {
        let alloc_budget = (self.alloc_limit > 0).then(|| {
            (self.alloc_limit as usize * 1024).saturating_sub(self.usage_bytes())
        });
        Limits {
            alloc_budget,
            ..Limits::default()
        }
    }

    pub fn load(&mut self, source: &str) -> LoadReport {
        self.namespace
            .load(source, search(&self.libpath, self.runtime))
    }

    pub fn load_file(&mut self, path: &Path) -> LoadReport {
        self.namespace
            .load_file(path, search(&self.libpath, self.runtime))
    }

    pub fn import(&mut self, path: &str, alias: Option<&str>) -> LoadReport {
        self.namespace
            .import(path, alias, search(&self.libpath, self.runtime))
    }

    pub fn compile(&mut self, source: &str) -> CompileReport {
        let program = match self.namespace.compile(source) {
            Ok(program) => program,
            Err(messages) => return CompileReport { id: None, messages },
        };
        let rules = program.rules().len();
        match self.patterns.insert(program) {
            Some(id) => {
                tracing::debug!(id, rules, source, "compiled");
                CompileReport {
                    id: Some(id),
                    messages: Vec::new(),
                }
            }
            None => CompileReport {
                id: None,
                messages: vec![Diagnostic::new(format!(
                    "too many live patterns (limit {})",
                    crate::table::MAX_PATTERNS
                ))],
            },
        }
    }

    /// Release a pattern; false if `id` was not live.
    pub fn free_pattern(&mut self, id: PatternId) -> bool {
        self.patterns.remove(id).is_some()
    }

    pub fn pattern(&self, id: PatternId) -> Option<&Program> {
        self.patterns.get(id)
    }

    /// Match `input` from 1-based position `start`.
    pub fn match_input(
        &self,
        id: PatternId,
        input: &[u8],
        start: i32,
        encoder: &str,
    ) -> Result<MatchReport, Fault> {
        let started = Instant::now();
        let Some(program) = self.patterns.get(id) else {
            return Ok(MatchReport::rejected(Outcome::InvalidPattern, started));
        };
        let Some(encoder) = self.runtime.encoders().get(encoder) else {
            return Ok(MatchReport::rejected(Outcome::InvalidEncoder, started));
        };
        let Some(start) = start_offset(start, input.len()) else {
            return Ok(MatchReport::rejected(Outcome::NoMatch, started));
        };
        let mut report = self.run_one(program, encoder, input, start)?;
        report.total_time = micros(started);
        Ok(report)
    }

    /// Match one record with an already validated program and encoder.
    pub(crate) fn run_one(
        &self,
        program: &Program,
        encoder: &dyn Encoder,
        input: &[u8],
        start: usize,
    ) -> Result<MatchReport, Fault> {
        let started = Instant::now();
        let result = vm::run(program, input, start, self.limits(), None);
        let match_time = micros(started);
        let (outcome, leftover) = match (&result.capture, result.end) {
            (Some(capture), Some(end)) => {
                let m = Encoding {
                    input,
                    capture,
                    palette: &self.palette,
                };
                let encoded = encoder.encode(&m).map_err(|source| Fault::Encode {
                    encoder: encoder.name(),
                    source,
                })?;
                (Outcome::from(encoded), input.len().saturating_sub(end))
            }
            _ => (Outcome::NoMatch, input.len() - start),
        };
        Ok(MatchReport {
            outcome,
            leftover,
            abend: result.abend.is_some(),
            total_time: micros(started),
            match_time,
        })
    }

    /// Trace a match of `input` from 1-based position `start`.
    pub fn trace(&self, id: PatternId, input: &[u8], start: i32, style: &str) -> TraceOutcome {
        let Some(program) = self.patterns.get(id) else {
            return TraceOutcome::InvalidPattern;
        };
        let Some(style) = TraceStyle::from_name(style) else {
            return TraceOutcome::InvalidStyle;
        };
        let Some(start) = start_offset(start, input.len()) else {
            return TraceOutcome::Traced {
                matched: false,
                trace: b"start position is beyond the end of the input\n".to_vec(),
            };
        };
        let mut tracer = Tracer::new(style);
        let result = vm::run(program, input, start, self.limits(), Some(&mut tracer));
        TraceOutcome::Traced {
            matched: result.end.is_some(),
            trace: tracer.finish(input, result.end, result.abend),
        }
    }
}

/// Convert a 1-based start position to a byte offset. Positions below 1
/// mean 1; positions past `len + 1` have no offset.
pub fn start_offset(start: i32, len: usize) -> Option<usize> {
    let offset = usize::try_from(start.max(1)).unwrap_or(1) - 1;
    (offset <= len).then_some(offset)
}

fn search<'a>(libpath: &'a [PathBuf], runtime: &'a Runtime) -> Search<'a> {
    Search {
        libpath,
        library: runtime.library(),
    }
}

fn micros(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
