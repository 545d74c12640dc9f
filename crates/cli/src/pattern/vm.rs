// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Backtracking PEG interpreter.
//!
//! Captures accumulate on a flat stack; every failed alternative truncates
//! the stack back to where it started, so only captures on the successful
//! path survive. Repetition is possessive.

use super::capture::{CAPTURE_COST, Capture};
use super::expr::{Expr, Rule, RuleId};
use super::matcher::LiteralMatcher;
use super::program::Program;

/// Maximum nesting of rule calls within one match.
pub const MAX_CALL_DEPTH: usize = 512;

/// Why a match was abandoned before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abend {
    /// Rule calls nested deeper than the call limit (e.g. left recursion).
    CallDepth,
    /// Captures exceeded the engine's allocation budget.
    AllocLimit,
}

/// Resource limits applied to one match.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_call_depth: usize,
    /// Bytes available for captures; `None` for unlimited.
    pub alloc_budget: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: MAX_CALL_DEPTH,
            alloc_budget: None,
        }
    }
}

/// A node being evaluated, as reported to an [`Observer`].
#[derive(Debug, Clone, Copy)]
pub enum Step<'p> {
    Rule(&'p Rule),
    Expr(&'p Expr),
}

/// Receives enter/exit notifications while matching (used for tracing).
pub trait Observer<'p> {
    fn enter(&mut self, step: Step<'p>, pos: usize);
    /// `end` is `None` when the step failed or the match was abandoned.
    fn exit(&mut self, step: Step<'p>, pos: usize, end: Option<usize>);
}

/// Result of running a program.
#[derive(Debug)]
pub struct RunResult<'p> {
    pub capture: Option<Capture<'p>>,
    /// End offset of the match.
    pub end: Option<usize>,
    pub abend: Option<Abend>,
    /// Bytes charged for captures.
    pub allocated: usize,
}

/// Run `program` against `input` starting at byte offset `start` (0-based).
pub fn run<'p>(
    program: &'p Program,
    input: &[u8],
    start: usize,
    limits: Limits,
    observer: Option<&mut dyn Observer<'p>>,
) -> RunResult<'p> {
    let mut vm = Vm {
        program,
        input,
        caps: Vec::new(),
        depth: 0,
        allocated: 0,
        limits,
        observer,
    };
    let result = vm.call(program.root(), start);
    let allocated = vm.allocated;
    match result {
        Ok(Some(end)) => RunResult {
            capture: vm.caps.pop(),
            end: Some(end),
            abend: None,
            allocated,
        },
        Ok(None) => RunResult {
            capture: None,
            end: None,
            abend: None,
            allocated,
        },
        Err(abend) => {
            tracing::debug!(?abend, start, "match abandoned");
            RunResult {
                capture: None,
                end: None,
                abend: Some(abend),
                allocated,
            }
        }
    }
}

struct Vm<'p, 'i, 'o> {
    program: &'p Program,
    input: &'i [u8],
    caps: Vec<Capture<'p>>,
    depth: usize,
    allocated: usize,
    limits: Limits,
    observer: Option<&'o mut dyn Observer<'p>>,
}

type Step_ = Result<Option<usize>, Abend>;

impl<'p> Vm<'p, '_, '_> {
    fn call(&mut self, id: RuleId, pos: usize) -> Step_ {
        let program = self.program;
        let Some(rule) = program.rule(id) else {
            return Ok(None);
        };
        if self.depth >= self.limits.max_call_depth {
            return Err(Abend::CallDepth);
        }
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.enter(Step::Rule(rule), pos);
        }
        self.depth += 1;
        let mark = self.caps.len();
        let result = match self.eval(&rule.body, pos) {
            Ok(Some(end)) if rule.capture => self.charge(CAPTURE_COST).map(|()| {
                let subs = self.caps.split_off(mark);
                self.caps.push(Capture {
                    name: &rule.name,
                    start: pos,
                    end,
                    subs,
                });
                Some(end)
            }),
            Ok(None) => {
                self.caps.truncate(mark);
                Ok(None)
            }
            other => other,
        };
        self.depth -= 1;
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.exit(Step::Rule(rule), pos, result.ok().flatten());
        }
        result
    }

    fn charge(&mut self, bytes: usize) -> Result<(), Abend> {
        self.allocated += bytes;
        match self.limits.alloc_budget {
            Some(budget) if self.allocated > budget => Err(Abend::AllocLimit),
            _ => Ok(()),
        }
    }

    fn eval(&mut self, expr: &'p Expr, pos: usize) -> Step_ {
        if let Expr::Call(id) = expr {
            return self.call(*id, pos);
        }
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.enter(Step::Expr(expr), pos);
        }
        let result = self.eval_node(expr, pos);
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.exit(Step::Expr(expr), pos, result.ok().flatten());
        }
        result
    }

    fn eval_node(&mut self, expr: &'p Expr, pos: usize) -> Step_ {
        let input = self.input;
        match expr {
            Expr::Literal(lit) => Ok(input
                .get(pos..)
                .filter(|tail| tail.starts_with(lit))
                .map(|_| pos + lit.len())),
            Expr::LiteralCi(lit) => Ok(input
                .get(pos..pos + lit.len())
                .filter(|s| s.eq_ignore_ascii_case(lit))
                .map(|_| pos + lit.len())),
            Expr::Set(set) => {
                if pos >= input.len() {
                    return Ok(None);
                }
                let (c, len) = decode_at(input, pos);
                Ok(set.contains(c).then_some(pos + len))
            }
            Expr::Any => {
                if pos >= input.len() {
                    return Ok(None);
                }
                Ok(Some(pos + decode_at(input, pos).1))
            }
            Expr::Start => Ok((pos == 0).then_some(pos)),
            Expr::End => Ok((pos >= input.len()).then_some(pos)),
            Expr::Boundary => Ok(boundary(input, pos)),
            Expr::Call(id) => self.call(*id, pos),
            Expr::Seq(items) => {
                let mark = self.caps.len();
                let mut cur = pos;
                for item in items {
                    match self.eval(item, cur)? {
                        Some(end) => cur = end,
                        None => {
                            self.caps.truncate(mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(cur))
            }
            Expr::Choice(alts) => {
                for alt in alts {
                    let mark = self.caps.len();
                    if let Some(end) = self.eval(alt, pos)? {
                        return Ok(Some(end));
                    }
                    self.caps.truncate(mark);
                }
                Ok(None)
            }
            Expr::Literals(m) => Ok(m.match_at(input, pos)),
            Expr::Repeat { inner, min, max } => self.repeat(inner, pos, *min, *max),
            Expr::Ahead(inner) => {
                let mark = self.caps.len();
                let hit = self.eval(inner, pos)?;
                self.caps.truncate(mark);
                Ok(hit.map(|_| pos))
            }
            Expr::NotAhead(inner) => {
                let mark = self.caps.len();
                let hit = self.eval(inner, pos)?;
                self.caps.truncate(mark);
                Ok(hit.is_none().then_some(pos))
            }
            Expr::Find { inner, all, prefix } => {
                let mut cur = pos;
                let mut last = None;
                while let Some((start, end)) = self.find_one(inner, prefix.as_ref(), cur)? {
                    last = Some(end);
                    if !*all {
                        break;
                    }
                    cur = if end > start { end } else { end + 1 };
                    if cur > input.len() {
                        break;
                    }
                }
                Ok(last)
            }
        }
    }

    fn repeat(&mut self, inner: &'p Expr, pos: usize, min: u32, max: Option<u32>) -> Step_ {
        let mark = self.caps.len();
        let mut count = 0u32;
        let mut cur = pos;
        while max.is_none_or(|m| count < m) {
            let iter_mark = self.caps.len();
            match self.eval(inner, cur)? {
                Some(end) if end > cur => {
                    cur = end;
                    count += 1;
                }
                // An empty iteration would repeat forever; it satisfies any minimum.
                Some(_) => {
                    count = count.max(min);
                    break;
                }
                None => {
                    self.caps.truncate(iter_mark);
                    break;
                }
            }
        }
        if count < min {
            self.caps.truncate(mark);
            return Ok(None);
        }
        Ok(Some(cur))
    }

    /// First position at or after `from` where `inner` matches.
    fn find_one(
        &mut self,
        inner: &'p Expr,
        prefix: Option<&LiteralMatcher>,
        from: usize,
    ) -> Result<Option<(usize, usize)>, Abend> {
        let input = self.input;
        let mut p = from;
        while p <= input.len() {
            if let Some(prefix) = prefix {
                match prefix.find_from(input, p) {
                    Some(next) => p = next,
                    None => return Ok(None),
                }
            }
            let mark = self.caps.len();
            if let Some(end) = self.eval(inner, p)? {
                return Ok(Some((p, end)));
            }
            self.caps.truncate(mark);
            p += decode_at(input, p).1;
        }
        Ok(None)
    }
}

/// Decode the character at `pos`: `(Some(c), len)` for valid UTF-8, or
/// `(None, 1)` for an undecodable byte or end of input.
pub fn decode_at(input: &[u8], pos: usize) -> (Option<char>, usize) {
    let tail = input.get(pos..(pos + 4).min(input.len())).unwrap_or_default();
    let valid = match std::str::from_utf8(tail) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&tail[..e.valid_up_to()]).unwrap_or_default(),
    };
    match valid.chars().next() {
        Some(c) => (Some(c), c.len_utf8()),
        None => (None, 1),
    }
}

/// Decode the character ending at `pos`.
fn decode_before(input: &[u8], pos: usize) -> Option<char> {
    let lo = pos.saturating_sub(4);
    (lo..pos)
        .find(|&i| input.get(i).is_some_and(|b| b & 0xC0 != 0x80))
        .and_then(|i| match decode_at(input, i) {
            (Some(c), len) if i + len == pos => Some(c),
            _ => None,
        })
}

/// Token boundary: a run of whitespace, or a zero-width position at the
/// edges of the input or next to punctuation.
fn boundary(input: &[u8], pos: usize) -> Option<usize> {
    let mut end = pos;
    while end < input.len() {
        match decode_at(input, end) {
            (Some(c), len) if c.is_whitespace() => end += len,
            _ => break,
        }
    }
    if end > pos || pos == 0 || pos >= input.len() {
        return Some(end);
    }
    let next = decode_at(input, pos).0;
    let prev = decode_before(input, pos);
    let punct = |c: Option<char>| c.is_some_and(|c| c.is_ascii_punctuation());
    let space = |c: Option<char>| c.is_some_and(char::is_whitespace);
    (punct(next) || punct(prev) || space(prev)).then_some(pos)
}

#[cfg(test)]
#[path = "vm_tests.rs"]
mod tests;
