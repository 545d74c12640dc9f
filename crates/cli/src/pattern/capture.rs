// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Match trees produced by the runtime.

/// One captured span, named after the rule that produced it.
///
/// Offsets are 0-based byte offsets into the input, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture<'p> {
    pub name: &'p str,
    pub start: usize,
    pub end: usize,
    pub subs: Vec<Capture<'p>>,
}

impl<'p> Capture<'p> {
    /// The captured bytes of `input`.
    pub fn text<'i>(&self, input: &'i [u8]) -> &'i [u8] {
        input.get(self.start..self.end).unwrap_or_default()
    }

    /// Captures without sub-captures, in input order.
    pub fn leaves(&self) -> Vec<&Capture<'p>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Capture<'p>>) {
        if self.subs.is_empty() {
            out.push(self);
        } else {
            for sub in &self.subs {
                sub.collect_leaves(out);
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn count(&self) -> usize {
        1 + self.subs.iter().map(Capture::count).sum::<usize>()
    }
}

/// Bytes charged against the allocation budget per capture node.
pub const CAPTURE_COST: usize = std::mem::size_of::<Capture<'static>>() + 16;
