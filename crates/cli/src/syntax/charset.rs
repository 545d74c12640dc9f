// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Character sets: ranges, named classes, complement.

/// A set of characters described by inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
    negated: bool,
}

/// Named classes usable as `[:name:]`.
const NAMED_CLASSES: &[(&str, &[(char, char)])] = &[
    ("alpha", &[('a', 'z'), ('A', 'Z')]),
    ("digit", &[('0', '9')]),
    ("alnum", &[('a', 'z'), ('A', 'Z'), ('0', '9')]),
    ("space", &[(' ', ' '), ('\t', '\r')]),
    ("punct", &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')]),
    ("upper", &[('A', 'Z')]),
    ("lower", &[('a', 'z')]),
    ("xdigit", &[('0', '9'), ('a', 'f'), ('A', 'F')]),
    ("word", &[('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')]),
];

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a named class such as `digit`.
    pub fn named(name: &str) -> Option<Self> {
        NAMED_CLASSES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, ranges)| Self {
                ranges: ranges.to_vec(),
                negated: false,
            })
    }

    /// Names of all known classes, for diagnostics.
    pub fn class_names() -> impl Iterator<Item = &'static str> {
        NAMED_CLASSES.iter().map(|(n, _)| *n)
    }

    pub fn push_range(&mut self, lo: char, hi: char) {
        self.ranges.push((lo, hi));
    }

    pub fn push_char(&mut self, c: char) {
        self.ranges.push((c, c));
    }

    /// Add every range of `other` (its complement flag is ignored).
    pub fn extend(&mut self, other: &CharSet) {
        self.ranges.extend_from_slice(&other.ranges);
    }

    pub fn negate(&mut self) {
        self.negated = !self.negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Membership test; `None` stands for an undecodable byte, which only a
    /// complemented set matches.
    pub fn contains(&self, c: Option<char>) -> bool {
        match c {
            Some(c) => {
                let hit = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
                hit != self.negated
            }
            None => self.negated,
        }
    }

    /// Ranges folded to ASCII case-insensitive form.
    pub fn case_folded(&self) -> Self {
        let mut out = self.clone();
        for &(lo, hi) in &self.ranges {
            for (from_lo, from_hi, delta) in [('a', 'z', -32i32), ('A', 'Z', 32i32)] {
                let lo2 = lo.max(from_lo);
                let hi2 = hi.min(from_hi);
                if lo2 <= hi2 {
                    let shift = |c: char| char::from_u32((c as i32 + delta) as u32).unwrap_or(c);
                    out.ranges.push((shift(lo2), shift(hi2)));
                }
            }
        }
        out
    }
}

/// Word characters for boundary detection.
pub fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
#[path = "charset_tests.rs"]
mod tests;
