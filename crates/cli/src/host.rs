// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Buffer-based entry points for embedders.
//!
//! Every function returns a status code: [`status::OK`] when the call
//! mechanically succeeded, whatever its semantic outcome, and non-zero for
//! a fault. Semantic outcomes travel in out-parameters, using data-less
//! buffers with sentinel lengths where a result has no payload.
//! Messages are JSON arrays of diagnostics.

use std::path::Path;

use crate::buffer::StrBuf;
use crate::diagnostic::{Diagnostic, to_json};
use crate::engine::{Engine, Fault, Outcome, TraceOutcome};
use crate::loader::LoadReport;
use crate::matchfile::{FileJob, FileOutcome};
use crate::rcfile::{RcFile, RcOutcome};
use crate::table::PatternId;

/// Status codes.
pub mod status {
    pub const OK: i32 = 0;
    /// Unclassified engine fault.
    pub const FAULT: i32 = 1;
    /// An argument was malformed (e.g. not UTF-8) or out of range.
    pub const INVALID_ARGUMENT: i32 = 2;
}

/// Sentinel lengths of a data-less match result buffer.
pub mod match_sentinel {
    pub const NO_MATCH: u32 = 0;
    pub const BOOLEAN: u32 = 1;
    pub const INVALID_ENCODER: u32 = 2;
    pub const INVALID_PATTERN: u32 = 4;
}

/// Sentinel lengths of a data-less trace buffer.
pub mod trace_sentinel {
    pub const INVALID_PATTERN: u32 = 1;
    pub const INVALID_STYLE: u32 = 2;
}

/// Codes left in `cout` when `match_file` reports `cin == -1`.
pub mod file_sentinel {
    pub const FAILED: i32 = -1;
    pub const INVALID_ENCODER: i32 = 2;
    pub const FILE_IO: i32 = 3;
    pub const INVALID_PATTERN: i32 = 4;
}

/// Owned engine handed to embedders.
#[derive(Debug)]
pub struct EngineHandle(Engine);

/// Match result out-parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub data: StrBuf,
    pub leftover: i32,
    pub abend: i32,
    pub ttotal: i32,
    pub tmatch: i32,
}

fn clamp<T: TryInto<i32>>(n: T) -> i32 {
    n.try_into().unwrap_or(i32::MAX)
}

fn text(buf: &StrBuf) -> Result<&str, i32> {
    std::str::from_utf8(buf.read().unwrap_or_default()).map_err(|_| status::INVALID_ARGUMENT)
}

fn fault_status(fault: &Fault) -> i32 {
    tracing::debug!(%fault, "engine fault");
    match fault {
        Fault::InvalidArgument(_) => status::INVALID_ARGUMENT,
        Fault::Runtime(_) | Fault::Encode { .. } => status::FAULT,
    }
}

fn messages(out: &mut StrBuf, diagnostics: &[Diagnostic]) {
    *out = StrBuf::from_vec(to_json(diagnostics));
}

/// Create an engine. On failure returns `None` with a message in `err`.
pub fn engine_new(home: Option<&Path>, err: &mut StrBuf) -> Option<EngineHandle> {
    match Engine::new(home) {
        Ok(engine) => Some(EngineHandle(engine)),
        Err(fault) => {
            *err = StrBuf::from(fault.to_string());
            None
        }
    }
}

/// Release every pattern and the engine itself.
pub fn engine_finalize(handle: EngineHandle) {
    let EngineHandle(mut engine) = handle;
    engine.finalize();
}

/// Configuration snapshot as JSON.
pub fn engine_config(handle: &EngineHandle, out: &mut StrBuf) -> i32 {
    match serde_json::to_vec(&handle.0.config()) {
        Ok(bytes) => {
            *out = StrBuf::from_vec(bytes);
            status::OK
        }
        Err(_) => status::FAULT,
    }
}

pub fn engine_set_libpath(handle: &mut EngineHandle, path: &StrBuf) -> i32 {
    match text(path) {
        Ok(path) => {
            handle.0.set_libpath(path);
            status::OK
        }
        Err(code) => code,
    }
}

pub fn engine_get_libpath(handle: &EngineHandle, out: &mut StrBuf) -> i32 {
    *out = StrBuf::from(handle.0.libpath());
    status::OK
}

/// Query (`*limit == -1`) or set the allocation limit in KB. On return
/// `limit` and `usage` hold the current values.
pub fn engine_alloc_limit(handle: &mut EngineHandle, limit: &mut i32, usage: &mut i32) -> i32 {
    if *limit != -1 {
        let Ok(kb) = u32::try_from(*limit) else {
            return status::INVALID_ARGUMENT;
        };
        if let Err(fault) = handle.0.set_alloc_limit(kb) {
            return fault_status(&fault);
        }
    }
    let (current, used) = handle.0.alloc_limit();
    *limit = clamp(current);
    *usage = clamp(used);
    status::OK
}

/// Compile an expression. `id` is 0 on failure, with messages in `err`.
pub fn engine_compile(
    handle: &mut EngineHandle,
    expression: &StrBuf,
    id: &mut PatternId,
    err: &mut StrBuf,
) -> i32 {
    let source = match text(expression) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let report = handle.0.compile(source);
    *id = report.id.unwrap_or(0);
    if !report.messages.is_empty() {
        messages(err, &report.messages);
    }
    status::OK
}

/// Release a pattern. Unknown ids are ignored.
pub fn engine_free_pattern(handle: &mut EngineHandle, id: PatternId) -> i32 {
    handle.0.free_pattern(id);
    status::OK
}

pub fn engine_match(
    handle: &EngineHandle,
    id: PatternId,
    start: i32,
    encoder: &str,
    input: &StrBuf,
    result: &mut MatchResult,
) -> i32 {
    let input = input.read().unwrap_or_default();
    let report = match handle.0.match_input(id, input, start, encoder) {
        Ok(report) => report,
        Err(fault) => return fault_status(&fault),
    };
    result.data = match report.outcome {
        Outcome::NoMatch => StrBuf::sentinel(match_sentinel::NO_MATCH),
        Outcome::BooleanMatch => StrBuf::sentinel(match_sentinel::BOOLEAN),
        Outcome::InvalidEncoder => StrBuf::sentinel(match_sentinel::INVALID_ENCODER),
        Outcome::InvalidPattern => StrBuf::sentinel(match_sentinel::INVALID_PATTERN),
        Outcome::Payload(bytes) => StrBuf::from_vec(bytes),
    };
    result.leftover = clamp(report.leftover);
    result.abend = i32::from(report.abend);
    result.ttotal = clamp(report.total_time);
    result.tmatch = clamp(report.match_time);
    status::OK
}

/// `paths` is `[input, output, errors]`; empty paths name the standard
/// streams. `counts` receives `[read, matched, unmatched]`, or
/// `[-1, code, 0]` on failure.
pub fn engine_match_file(
    handle: &EngineHandle,
    id: PatternId,
    encoder: &str,
    whole_file: bool,
    paths: [&str; 3],
    counts: &mut [i32; 3],
    err: &mut StrBuf,
) -> i32 {
    let [infile, outfile, errfile] = paths;
    let job = FileJob {
        infile,
        outfile,
        errfile,
        whole_file,
    };
    let outcome = match handle.0.match_file(id, encoder, job) {
        Ok(outcome) => outcome,
        Err(fault) => {
            *err = StrBuf::from(fault.to_string());
            return fault_status(&fault);
        }
    };
    *counts = match outcome {
        FileOutcome::Counts { cin, cout, cerr } => [clamp(cin), clamp(cout), clamp(cerr)],
        FileOutcome::InvalidEncoder => [file_sentinel::FAILED, file_sentinel::INVALID_ENCODER, 0],
        FileOutcome::InvalidPattern => [file_sentinel::FAILED, file_sentinel::INVALID_PATTERN, 0],
        FileOutcome::Io(message) => {
            *err = StrBuf::from(message);
            [file_sentinel::FAILED, file_sentinel::FILE_IO, 0]
        }
    };
    status::OK
}

pub fn engine_trace(
    handle: &EngineHandle,
    id: PatternId,
    start: i32,
    style: &str,
    input: &StrBuf,
    matched: &mut bool,
    trace: &mut StrBuf,
) -> i32 {
    let input = input.read().unwrap_or_default();
    *matched = false;
    match handle.0.trace(id, input, start, style) {
        TraceOutcome::InvalidPattern => *trace = StrBuf::sentinel(trace_sentinel::INVALID_PATTERN),
        TraceOutcome::InvalidStyle => *trace = StrBuf::sentinel(trace_sentinel::INVALID_STYLE),
        TraceOutcome::Traced {
            matched: hit,
            trace: bytes,
        } => {
            *matched = hit;
            *trace = StrBuf::from_vec(bytes);
        }
    }
    status::OK
}

/// Out-parameters shared by the load family.
#[derive(Debug, Default)]
pub struct LoadOut {
    pub ok: bool,
    pub package: StrBuf,
    pub messages: StrBuf,
}

impl LoadOut {
    fn fill(&mut self, report: LoadReport) -> i32 {
        self.ok = report.ok;
        if let Some(package) = report.package {
            self.package = StrBuf::from(package);
        }
        if !report.messages.is_empty() {
            messages(&mut self.messages, &report.messages);
        }
        status::OK
    }
}

pub fn engine_load(handle: &mut EngineHandle, source: &StrBuf, out: &mut LoadOut) -> i32 {
    match text(source) {
        Ok(source) => out.fill(handle.0.load(source)),
        Err(code) => code,
    }
}

pub fn engine_load_file(handle: &mut EngineHandle, path: &StrBuf, out: &mut LoadOut) -> i32 {
    match text(path) {
        Ok(path) => out.fill(handle.0.load_file(Path::new(path))),
        Err(code) => code,
    }
}

/// Import a package; a data-less `alias` binds it under its own name.
pub fn engine_import(
    handle: &mut EngineHandle,
    path: &StrBuf,
    alias: &StrBuf,
    out: &mut LoadOut,
) -> i32 {
    let (path, alias) = match (text(path), alias.read().map(std::str::from_utf8)) {
        (Ok(path), None) => (path, None),
        (Ok(path), Some(Ok(alias))) => (path, Some(alias)),
        (Err(code), _) => return code,
        (_, Some(Err(_))) => return status::INVALID_ARGUMENT,
    };
    out.fill(handle.0.import(path, alias))
}

fn rc_path(path: &StrBuf) -> Result<Option<&Path>, i32> {
    match path.read() {
        None => Ok(None),
        Some(_) => text(path).map(|p| Some(Path::new(p))),
    }
}

/// Read an rc file (default location when `path` has no data).
///
/// `file_exists` is false when there is no file. Valid options are written
/// to `options` as JSON; otherwise `options` stays data-less and
/// `messages` explains why.
pub fn engine_read_rcfile(
    handle: &EngineHandle,
    path: &StrBuf,
    file_exists: &mut bool,
    options: &mut StrBuf,
    messages_out: &mut StrBuf,
) -> i32 {
    let path = match rc_path(path) {
        Ok(path) => path,
        Err(code) => return code,
    };
    match handle.0.read_rc_file(path) {
        RcFile::Missing => *file_exists = false,
        RcFile::Invalid(diagnostics) => {
            *file_exists = true;
            messages(messages_out, &diagnostics);
        }
        RcFile::Options(parsed) => {
            *file_exists = true;
            match serde_json::to_vec(&parsed) {
                Ok(bytes) => *options = StrBuf::from_vec(bytes),
                Err(_) => return status::FAULT,
            }
        }
    }
    status::OK
}

/// Execute an rc file (default location when `path` has no data).
pub fn engine_execute_rcfile(
    handle: &mut EngineHandle,
    path: &StrBuf,
    file_exists: &mut bool,
    no_errors: &mut bool,
    messages_out: &mut StrBuf,
) -> i32 {
    let path = match rc_path(path) {
        Ok(path) => path,
        Err(code) => return code,
    };
    match handle.0.execute_rc_file(path) {
        RcOutcome::Missing => *file_exists = false,
        RcOutcome::Failed(diagnostics) => {
            *file_exists = true;
            *no_errors = false;
            messages(messages_out, &diagnostics);
        }
        RcOutcome::Applied => {
            *file_exists = true;
            *no_errors = true;
        }
    }
    status::OK
}

/// Release a buffer returned by any entry point.
pub fn free_string(buf: StrBuf) {
    drop(buf);
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
