// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Packages compiled into the binary, importable without a libpath.

const BUILTIN: &[(&str, &str)] = &[
    ("num", include_str!("../../rpl/num.rpl")),
    ("word", include_str!("../../rpl/word.rpl")),
    ("net", include_str!("../../rpl/net.rpl")),
    ("date", include_str!("../../rpl/date.rpl")),
];

/// The built-in package sources, by import path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Library;

impl Library {
    pub fn get(&self, path: &str) -> Option<&'static str> {
        BUILTIN
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, source)| *source)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
#[path = "library_tests.rs"]
mod tests;
