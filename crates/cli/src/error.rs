// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Errors reported to library callers.
///
/// Recoverable outcomes such as compile errors or an unmatched input are
/// returned as data, not as errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine could not be created.
    #[error("engine initialization failed: {0}")]
    Initialization(String),

    /// An operation was attempted on a finalized engine.
    #[error("engine used after finalize")]
    UseAfterFinalize,

    /// The engine reported a fault it does not classify.
    #[error("{operation}() failed: {message} (please report this as a bug)")]
    Internal {
        operation: &'static str,
        message: String,
    },

    /// An argument was rejected before reaching the engine.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The pattern was never compiled, was released, or belongs to another
    /// engine.
    #[error("invalid compiled pattern (already released?)")]
    InvalidPattern,

    #[error("invalid output encoder: {0}")]
    InvalidEncoder(String),

    #[error("invalid trace style: {0}")]
    InvalidTraceStyle(String),

    /// A file given to `match_file` could not be read or written.
    #[error("{0}")]
    FileIo(String),

    /// `match_file` failed for a reason the engine did not report.
    #[error("unknown error caused match_file to fail")]
    MatchFile,

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds maximum size limit.
    #[error("file too large: {} ({} bytes, max: {} bytes)", .path.display(), .size, .max_size)]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },
}

/// Result type using quarry Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes of the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// At least one match
    Success = 0,
    /// Nothing matched
    NoMatch = 1,
    /// Usage, pattern, or configuration error
    ConfigError = 2,
    /// Internal error
    InternalError = 3,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Initialization(_)
            | Error::InvalidArgument(_)
            | Error::InvalidPattern
            | Error::InvalidEncoder(_)
            | Error::InvalidTraceStyle(_)
            | Error::FileIo(_)
            | Error::FileTooLarge { .. }
            | Error::Config { .. } => ExitCode::ConfigError,
            Error::UseAfterFinalize
            | Error::Internal { .. }
            | Error::MatchFile
            | Error::Io { .. } => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
