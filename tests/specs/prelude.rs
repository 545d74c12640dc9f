//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Returns a Command running the quarry binary with a clean environment:
/// no rc file, no inherited libpath or home, and no color.
pub fn quarry_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("quarry"));
    cmd.env_remove("QUARRY_HOME")
        .env_remove("QUARRY_LIBPATH")
        .env_remove("QUARRY_RCFILE")
        .env_remove("QUARRY_LOG")
        .env_remove("COLOR")
        .env("NO_COLOR", "1")
        .env("HOME", "/nonexistent");
    cmd
}

/// A temporary directory with helpers for writing fixture files.
pub struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` (parent directories created) and return
    /// the full path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}
