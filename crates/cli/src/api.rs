// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Caller API: sessions and compiled patterns.
//!
//! Built on the [`host`](crate::host) entry points. Wire sentinels are
//! decoded into [`Error`] variants or plain result types here, so callers
//! never see status codes or sentinel lengths.

use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};

use crate::buffer::StrBuf;
use crate::diagnostic::{Diagnostic, from_json};
use crate::engine::{Config, MIN_ALLOC_LIMIT_KB};
use crate::error::{Error, Result};
use crate::host::{
    self, EngineHandle, LoadOut, MatchResult, file_sentinel, match_sentinel, status,
    trace_sentinel,
};
use crate::loader::LoadReport;
use crate::rcfile::{RcFile, RcOptions, RcOutcome};
use crate::table::PatternId;

type Shared = Rc<RefCell<Option<EngineHandle>>>;

/// One engine, from creation to finalize.
///
/// Not `Send`: an engine belongs to one thread. Create one session per
/// worker.
#[derive(Debug)]
pub struct Session {
    inner: Shared,
}

/// A compiled pattern owned by a [`Session`].
///
/// Dropping the pattern releases it.
#[derive(Debug)]
pub struct Pattern {
    id: PatternId,
    owner: Weak<RefCell<Option<EngineHandle>>>,
}

/// Payload of a successful [`Session::match_input`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchData {
    NoMatch,
    /// Matched; the encoder produces no data.
    Matched,
    Bytes(Vec<u8>),
}

/// Result of [`Session::match_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub data: MatchData,
    pub leftover: usize,
    pub abend: bool,
    /// Microseconds.
    pub total_time: u64,
    /// Microseconds.
    pub match_time: u64,
}

impl Match {
    pub fn matched(&self) -> bool {
        !matches!(self.data, MatchData::NoMatch)
    }
}

/// Files for [`Session::match_file`]. `None` means the standard stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileArgs<'a> {
    pub input: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub errors: Option<&'a Path>,
    pub whole_file: bool,
}

/// Record counts from [`Session::match_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCounts {
    pub read: u64,
    pub matched: u64,
    pub unmatched: u64,
}

fn internal(operation: &'static str, code: i32) -> Error {
    Error::Internal {
        operation,
        message: format!("status {code}"),
    }
}

fn check(operation: &'static str, code: i32) -> Result<()> {
    if code == status::OK {
        Ok(())
    } else {
        Err(internal(operation, code))
    }
}

fn utf8(buf: StrBuf) -> Option<String> {
    buf.into_bytes()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn diagnostics(buf: &StrBuf) -> Vec<Diagnostic> {
    buf.read().map(from_json).unwrap_or_default()
}

fn path_text(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::InvalidArgument(format!("path is not UTF-8: {}", path.display())))
}

/// Wire form of an optional file path: empty for the standard stream.
fn stream_path(path: Option<&Path>) -> Result<&str> {
    Ok(path.map(path_text).transpose()?.unwrap_or_default())
}

impl Session {
    /// Create a session. `home` sets the runtime home on first use in
    /// this process.
    pub fn new(home: Option<&Path>) -> Result<Self> {
        let mut err = StrBuf::empty();
        match host::engine_new(home, &mut err) {
            Some(handle) => Ok(Self {
                inner: Rc::new(RefCell::new(Some(handle))),
            }),
            None => Err(Error::Initialization(
                utf8(err).unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut EngineHandle) -> R) -> Result<R> {
        let mut guard = self.inner.borrow_mut();
        let handle = guard.as_mut().ok_or(Error::UseAfterFinalize)?;
        Ok(f(handle))
    }

    /// Id of `pattern` if it is live and belongs to this session.
    fn target(&self, pattern: &Pattern) -> Result<PatternId> {
        if self.inner.borrow().is_none() {
            return Err(Error::UseAfterFinalize);
        }
        let owned = pattern
            .owner
            .upgrade()
            .is_some_and(|owner| Rc::ptr_eq(&owner, &self.inner));
        if pattern.id == 0 || !owned {
            return Err(Error::InvalidPattern);
        }
        Ok(pattern.id)
    }

    /// Release the engine and every pattern compiled by it. Later calls
    /// are no-ops.
    pub fn finalize(&self) {
        if let Some(handle) = self.inner.borrow_mut().take() {
            host::engine_finalize(handle);
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.inner.borrow().is_none()
    }

    pub fn config(&self) -> Result<Config> {
        let mut out = StrBuf::empty();
        check("config", self.with(|h| host::engine_config(h, &mut out))?)?;
        let bytes = out.read().unwrap_or_default();
        serde_json::from_slice(bytes).map_err(|e| Error::Internal {
            operation: "config",
            message: e.to_string(),
        })
    }

    pub fn libpath(&self) -> Result<String> {
        let mut out = StrBuf::empty();
        check("libpath", self.with(|h| host::engine_get_libpath(h, &mut out))?)?;
        Ok(utf8(out).unwrap_or_default())
    }

    pub fn set_libpath(&self, path: &str) -> Result<()> {
        let path = StrBuf::from(path);
        check("libpath", self.with(|h| host::engine_set_libpath(h, &path))?)
    }

    /// Query (`None`) or set the allocation limit in KB. Returns
    /// `(limit, usage)`.
    pub fn alloc_limit(&self, new_limit: Option<i32>) -> Result<(i32, i32)> {
        let mut limit = match new_limit {
            None => -1,
            Some(n) if n == 0 || n >= MIN_ALLOC_LIMIT_KB as i32 => n,
            Some(n) => {
                return Err(Error::InvalidArgument(format!(
                    "new allocation limit must be {MIN_ALLOC_LIMIT_KB} KB or higher (or zero for unlimited), got {n}"
                )));
            }
        };
        let mut usage = 0;
        check(
            "alloc_limit",
            self.with(|h| host::engine_alloc_limit(h, &mut limit, &mut usage))?,
        )?;
        Ok((limit, usage))
    }

    fn load_with(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut EngineHandle, &mut LoadOut) -> i32,
    ) -> Result<LoadReport> {
        let mut out = LoadOut::default();
        check(operation, self.with(|h| f(h, &mut out))?)?;
        let messages = diagnostics(&out.messages);
        Ok(LoadReport {
            ok: out.ok,
            package: utf8(out.package),
            messages,
        })
    }

    /// Load pattern source. Compile errors are reported in the result.
    pub fn load(&self, source: &str) -> Result<LoadReport> {
        let source = StrBuf::from(source);
        self.load_with("load", |h, out| host::engine_load(h, &source, out))
    }

    pub fn load_file(&self, path: &Path) -> Result<LoadReport> {
        let path = StrBuf::from(path_text(path)?);
        self.load_with("load_file", |h, out| host::engine_load_file(h, &path, out))
    }

    /// Import a package, bound under `alias` or its declared name.
    pub fn import(&self, path: &str, alias: Option<&str>) -> Result<LoadReport> {
        let path = StrBuf::from(path);
        let alias = alias.map(StrBuf::from).unwrap_or_default();
        self.load_with("import", |h, out| host::engine_import(h, &path, &alias, out))
    }

    /// Compile an expression. On failure the pattern is `None` and the
    /// messages say why.
    pub fn compile(&self, expression: &str) -> Result<(Option<Pattern>, Vec<Diagnostic>)> {
        let source = StrBuf::from(expression);
        let mut id = 0;
        let mut err = StrBuf::empty();
        check(
            "compile",
            self.with(|h| host::engine_compile(h, &source, &mut id, &mut err))?,
        )?;
        let pattern = (id != 0).then(|| Pattern {
            id,
            owner: Rc::downgrade(&self.inner),
        });
        Ok((pattern, diagnostics(&err)))
    }

    /// Match `input` from 1-based position `start`.
    pub fn match_input(
        &self,
        pattern: &Pattern,
        input: &[u8],
        start: i32,
        encoder: &str,
    ) -> Result<Match> {
        let id = self.target(pattern)?;
        let input = StrBuf::from_bytes(input);
        let mut result = MatchResult::default();
        check(
            "match",
            self.with(|h| host::engine_match(h, id, start, encoder, &input, &mut result))?,
        )?;
        let data = match (result.data.is_null(), result.data.len()) {
            (false, _) => MatchData::Bytes(result.data.into_bytes().unwrap_or_default()),
            (true, match_sentinel::NO_MATCH) => MatchData::NoMatch,
            (true, match_sentinel::BOOLEAN) => MatchData::Matched,
            (true, match_sentinel::INVALID_ENCODER) => {
                return Err(Error::InvalidEncoder(encoder.to_string()));
            }
            (true, match_sentinel::INVALID_PATTERN) => return Err(Error::InvalidPattern),
            (true, code) => {
                return Err(Error::Internal {
                    operation: "match",
                    message: format!("unexpected result code {code}"),
                });
            }
        };
        Ok(Match {
            data,
            leftover: usize::try_from(result.leftover).unwrap_or_default(),
            abend: result.abend != 0,
            total_time: u64::try_from(result.ttotal).unwrap_or_default(),
            match_time: u64::try_from(result.tmatch).unwrap_or_default(),
        })
    }

    /// Trace a match. Returns whether it matched and the trace text.
    pub fn trace(
        &self,
        pattern: &Pattern,
        input: &[u8],
        start: i32,
        style: &str,
    ) -> Result<(bool, Vec<u8>)> {
        let id = self.target(pattern)?;
        let input = StrBuf::from_bytes(input);
        let mut matched = false;
        let mut trace = StrBuf::empty();
        check(
            "trace",
            self.with(|h| host::engine_trace(h, id, start, style, &input, &mut matched, &mut trace))?,
        )?;
        if trace.is_null() {
            return Err(match trace.len() {
                trace_sentinel::INVALID_STYLE => Error::InvalidTraceStyle(style.to_string()),
                trace_sentinel::INVALID_PATTERN => Error::InvalidPattern,
                code => Error::Internal {
                    operation: "trace",
                    message: format!("unexpected result code {code}"),
                },
            });
        }
        Ok((matched, trace.into_bytes().unwrap_or_default()))
    }

    /// Match every record of a file.
    pub fn match_file(
        &self,
        pattern: &Pattern,
        encoder: &str,
        files: FileArgs<'_>,
    ) -> Result<FileCounts> {
        let id = self.target(pattern)?;
        let paths = [
            stream_path(files.input)?,
            stream_path(files.output)?,
            stream_path(files.errors)?,
        ];
        let mut counts = [0; 3];
        let mut err = StrBuf::empty();
        let code = self.with(|h| {
            host::engine_match_file(h, id, encoder, files.whole_file, paths, &mut counts, &mut err)
        })?;
        if code != status::OK {
            return Err(Error::Internal {
                operation: "match_file",
                message: utf8(err).unwrap_or_else(|| format!("status {code}")),
            });
        }
        match counts {
            [file_sentinel::FAILED, file_sentinel::INVALID_ENCODER, _] => {
                Err(Error::InvalidEncoder(encoder.to_string()))
            }
            [file_sentinel::FAILED, file_sentinel::FILE_IO, _] => {
                Err(Error::FileIo(utf8(err).unwrap_or_default()))
            }
            [file_sentinel::FAILED, file_sentinel::INVALID_PATTERN, _] => Err(Error::InvalidPattern),
            [file_sentinel::FAILED, _, _] => Err(Error::MatchFile),
            [cin, cout, cerr] => Ok(FileCounts {
                read: u64::try_from(cin).unwrap_or_default(),
                matched: u64::try_from(cout).unwrap_or_default(),
                unmatched: u64::try_from(cerr).unwrap_or_default(),
            }),
        }
    }

    /// Read an rc file; `None` reads `$HOME/.quarryrc`.
    pub fn read_rc_file(&self, path: Option<&Path>) -> Result<RcFile> {
        let path = path.map(path_text).transpose()?.map(StrBuf::from).unwrap_or_default();
        let mut exists = false;
        let mut options = StrBuf::empty();
        let mut messages = StrBuf::empty();
        check(
            "read_rcfile",
            self.with(|h| {
                host::engine_read_rcfile(h, &path, &mut exists, &mut options, &mut messages)
            })?,
        )?;
        if !exists {
            return Ok(RcFile::Missing);
        }
        match options.read() {
            Some(json) => serde_json::from_slice::<RcOptions>(json)
                .map(RcFile::Options)
                .map_err(|e| Error::Internal {
                    operation: "read_rcfile",
                    message: e.to_string(),
                }),
            None => Ok(RcFile::Invalid(diagnostics(&messages))),
        }
    }

    /// Execute an rc file; `None` executes `$HOME/.quarryrc`.
    pub fn execute_rc_file(&self, path: Option<&Path>) -> Result<RcOutcome> {
        let path = path.map(path_text).transpose()?.map(StrBuf::from).unwrap_or_default();
        let mut exists = false;
        let mut clean = false;
        let mut messages = StrBuf::empty();
        check(
            "execute_rcfile",
            self.with(|h| {
                host::engine_execute_rcfile(h, &path, &mut exists, &mut clean, &mut messages)
            })?,
        )?;
        Ok(match (exists, clean) {
            (false, _) => RcOutcome::Missing,
            (true, true) => RcOutcome::Applied,
            (true, false) => RcOutcome::Failed(diagnostics(&messages)),
        })
    }
}

impl Pattern {
    /// Wire id; 0 once released.
    pub fn id(&self) -> PatternId {
        self.id
    }

    /// Release the pattern now. Safe to call more than once.
    pub fn release(&mut self) {
        let id = std::mem::take(&mut self.id);
        if id == 0 {
            return;
        }
        if let Some(owner) = self.owner.upgrade()
            && let Ok(mut guard) = owner.try_borrow_mut()
            && let Some(handle) = guard.as_mut()
        {
            host::engine_free_pattern(handle, id);
        }
    }
}

impl Drop for Pattern {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
