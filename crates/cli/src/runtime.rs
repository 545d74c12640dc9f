// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide runtime shared by every engine.
//!
//! Initialized once, on first engine creation, and lives until process
//! exit. Concurrent first use from several threads is safe: one
//! initialization wins and the others observe it.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::encoder::Registry;
use crate::loader::Library;
use crate::pattern::TraceStyle;

/// Environment variable naming the runtime home directory.
pub const HOME_ENV: &str = "QUARRY_HOME";

/// Environment variable holding the default libpath (`:`-separated).
pub const LIBPATH_ENV: &str = "QUARRY_LIBPATH";

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Where the default libpath came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibpathSource {
    Environment,
    Home,
    Unset,
}

impl LibpathSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LibpathSource::Environment => "environment",
            LibpathSource::Home => "home",
            LibpathSource::Unset => "unset",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("home directory {} is not a directory", .0.display())]
    BadHome(PathBuf),
}

/// Shared, immutable state: encoders, trace styles, built-in packages, and
/// defaults for new engines.
#[derive(Debug)]
pub struct Runtime {
    home: Option<PathBuf>,
    encoders: Registry,
    library: Library,
    default_libpath: Vec<PathBuf>,
    libpath_source: LibpathSource,
}

impl Runtime {
    /// The process runtime, initializing it on first use.
    ///
    /// `home` (else `QUARRY_HOME`) must name a directory when given. Once
    /// initialized, later calls return the existing runtime and ignore
    /// `home`.
    pub fn get_or_init(home: Option<&Path>) -> Result<&'static Runtime, RuntimeError> {
        if let Some(runtime) = RUNTIME.get() {
            if home.is_some_and(|h| runtime.home.as_deref() != Some(h)) {
                tracing::warn!("runtime already initialized; ignoring new home directory");
            }
            return Ok(runtime);
        }
        let home = home
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(HOME_ENV).map(PathBuf::from));
        let runtime = Runtime::build(home, std::env::var(LIBPATH_ENV).ok())?;
        Ok(RUNTIME.get_or_init(|| runtime))
    }

    fn build(home: Option<PathBuf>, libpath_env: Option<String>) -> Result<Self, RuntimeError> {
        if let Some(home) = &home
            && !home.is_dir()
        {
            return Err(RuntimeError::BadHome(home.clone()));
        }
        let (default_libpath, libpath_source) = match (libpath_env, &home) {
            (Some(env), _) if !env.is_empty() => (split_libpath(&env), LibpathSource::Environment),
            (_, Some(home)) => (vec![home.join("rpl")], LibpathSource::Home),
            _ => (Vec::new(), LibpathSource::Unset),
        };
        tracing::debug!(home = ?home, libpath = ?default_libpath, "runtime initialized");
        Ok(Self {
            home,
            encoders: Registry::builtin(),
            library: Library,
            default_libpath,
            libpath_source,
        })
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn encoders(&self) -> &Registry {
        &self.encoders
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn trace_styles(&self) -> impl Iterator<Item = TraceStyle> {
        TraceStyle::ALL.into_iter()
    }

    pub fn default_libpath(&self) -> &[PathBuf] {
        &self.default_libpath
    }

    pub fn libpath_source(&self) -> LibpathSource {
        self.libpath_source
    }
}

/// Split a `:`-separated libpath, dropping empty entries.
pub fn split_libpath(path: &str) -> Vec<PathBuf> {
    path.split(':')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Join libpath directories with `:`.
pub fn join_libpath(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
