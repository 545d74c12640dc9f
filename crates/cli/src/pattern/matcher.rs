// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Literal fast paths used by compiled programs.
//!
//! - Leading literal of a `find:` target: memchr::memmem
//! - Ordered choice of literals: anchored leftmost-first aho-corasick

use aho_corasick::{AhoCorasick, Anchored, Input, MatchKind, StartKind};
use memchr::memmem::Finder;

/// Searches forward for a single literal using SIMD-optimized memchr.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    len: usize,
    finder: Finder<'static>,
}

/// Matches one of several literals at a fixed position, preferring the
/// earliest listed alternative (PEG ordered choice).
#[derive(Debug, Clone)]
pub struct MultiLiteralMatcher {
    literals: Vec<Box<[u8]>>,
    automaton: AhoCorasick,
}

/// Error building a literal automaton.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("aho-corasick error: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

impl LiteralMatcher {
    pub fn new(literal: &[u8]) -> Self {
        Self {
            len: literal.len(),
            finder: Finder::new(literal).into_owned(),
        }
    }

    /// Offset of the first occurrence at or after `from`.
    pub fn find_from(&self, haystack: &[u8], from: usize) -> Option<usize> {
        let tail = haystack.get(from..)?;
        self.finder.find(tail).map(|off| from + off)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl MultiLiteralMatcher {
    /// Build an anchored automaton over `literals` in priority order.
    pub fn new(literals: &[&[u8]], ascii_case_insensitive: bool) -> Result<Self, MatcherError> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .start_kind(StartKind::Anchored)
            .ascii_case_insensitive(ascii_case_insensitive)
            .build(literals)?;
        Ok(Self {
            literals: literals.iter().map(|l| Box::<[u8]>::from(*l)).collect(),
            automaton,
        })
    }

    /// End offset of the first alternative matching at `pos`.
    pub fn match_at(&self, input: &[u8], pos: usize) -> Option<usize> {
        if pos > input.len() {
            return None;
        }
        let query = Input::new(input).range(pos..).anchored(Anchored::Yes);
        self.automaton.find(query).map(|m| m.end())
    }

    pub fn literals(&self) -> impl Iterator<Item = &[u8]> {
        self.literals.iter().map(|l| &**l)
    }

    pub fn footprint(&self) -> usize {
        self.automaton.memory_usage() + self.literals.iter().map(|l| l.len()).sum::<usize>()
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
