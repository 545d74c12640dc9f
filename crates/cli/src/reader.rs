// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Size-gated whole-input reading.
//!
//! Whole-file matching holds the entire input in memory, so inputs larger
//! than the reader's maximum are rejected instead of read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Size at which reads are logged (16MB).
pub const LARGE_FILE_WARN: u64 = 16 * 1024 * 1024;

/// Maximum input size to read (64MB).
pub const MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Size-gated file reader.
#[derive(Debug, Clone, Copy)]
pub struct FileReader {
    /// Maximum input size to read.
    max_size: u64,
}

impl Default for FileReader {
    fn default() -> Self {
        Self {
            max_size: MAX_FILE_SIZE,
        }
    }
}

impl FileReader {
    /// Create a new file reader with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom max size.
    pub fn with_max_size(max_size: u64) -> Self {
        Self { max_size }
    }

    /// Read a file, checking size limits.
    ///
    /// Returns `Err(FileTooLarge)` for files exceeding max_size.
    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > self.max_size {
            return Err(Error::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max_size: self.max_size,
            });
        }
        if size > LARGE_FILE_WARN {
            tracing::info!(
                path = %path.display(),
                size_mb = size as f64 / 1_000_000.0,
                "Reading large file"
            );
        }
        let file = File::open(path).map_err(io_err)?;
        self.read_stream(file, path)
    }

    /// Read a stream of unknown length (such as stdin), stopping with
    /// `Err(FileTooLarge)` once it exceeds max_size. `name` labels errors.
    pub fn read_stream(&self, stream: impl Read, name: &Path) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        stream
            .take(self.max_size.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(|source| Error::Io {
                path: name.to_path_buf(),
                source,
            })?;
        if buffer.len() as u64 > self.max_size {
            return Err(Error::FileTooLarge {
                path: name.to_path_buf(),
                size: buffer.len() as u64,
                max_size: self.max_size,
            });
        }
        Ok(buffer)
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
