// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved pattern expressions.

use std::fmt;

use super::matcher::{LiteralMatcher, MultiLiteralMatcher};
use crate::syntax::CharSet;

/// Index of a rule, either in an engine's rule store or in a program's
/// own rule table.
pub type RuleId = usize;

/// A named definition.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Qualified name (`name` or `pkg.name`); also the capture type.
    pub name: String,
    /// Whether a successful match of this rule produces a capture.
    pub capture: bool,
    pub body: Expr,
}

/// Pattern expression with all references resolved to rule ids.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Box<[u8]>),
    /// ASCII case-insensitive literal, stored lowercased.
    LiteralCi(Box<[u8]>),
    Set(CharSet),
    Any,
    Start,
    End,
    Boundary,
    Call(RuleId),
    Seq(Vec<Expr>),
    Choice(Vec<Expr>),
    /// Ordered choice of literals compiled to one automaton.
    Literals(MultiLiteralMatcher),
    Repeat {
        inner: Box<Expr>,
        min: u32,
        max: Option<u32>,
    },
    Ahead(Box<Expr>),
    NotAhead(Box<Expr>),
    Find {
        inner: Box<Expr>,
        all: bool,
        /// Leading literal of `inner`, used to skip to candidate positions.
        prefix: Option<LiteralMatcher>,
    },
}

impl Expr {
    /// The empty sequence, which always succeeds without consuming input.
    pub fn empty() -> Self {
        Expr::Seq(Vec::new())
    }

    /// Visit every rule id referenced by this expression.
    pub fn for_each_call(&self, f: &mut dyn FnMut(RuleId)) {
        match self {
            Expr::Call(id) => f(*id),
            Expr::Seq(items) | Expr::Choice(items) => {
                for item in items {
                    item.for_each_call(f);
                }
            }
            Expr::Repeat { inner, .. }
            | Expr::Ahead(inner)
            | Expr::NotAhead(inner)
            | Expr::Find { inner, .. } => inner.for_each_call(f),
            Expr::Literal(_)
            | Expr::LiteralCi(_)
            | Expr::Set(_)
            | Expr::Any
            | Expr::Start
            | Expr::End
            | Expr::Boundary
            | Expr::Literals(_) => {}
        }
    }

    /// Clone with every rule id rewritten through `f`.
    pub fn remap(&self, f: &dyn Fn(RuleId) -> RuleId) -> Expr {
        match self {
            Expr::Call(id) => Expr::Call(f(*id)),
            Expr::Seq(items) => Expr::Seq(items.iter().map(|e| e.remap(f)).collect()),
            Expr::Choice(items) => Expr::Choice(items.iter().map(|e| e.remap(f)).collect()),
            Expr::Repeat { inner, min, max } => Expr::Repeat {
                inner: Box::new(inner.remap(f)),
                min: *min,
                max: *max,
            },
            Expr::Ahead(inner) => Expr::Ahead(Box::new(inner.remap(f))),
            Expr::NotAhead(inner) => Expr::NotAhead(Box::new(inner.remap(f))),
            Expr::Find { inner, all, prefix } => Expr::Find {
                inner: Box::new(inner.remap(f)),
                all: *all,
                prefix: prefix.clone(),
            },
            other => other.clone(),
        }
    }

    /// Leading literal bytes, when the expression must start with one.
    pub fn leading_literal(&self) -> Option<&[u8]> {
        match self {
            Expr::Literal(bytes) if !bytes.is_empty() => Some(bytes),
            Expr::Seq(items) => items.first().and_then(Expr::leading_literal),
            _ => None,
        }
    }

    /// Rough heap footprint, for allocation accounting.
    pub fn footprint(&self) -> usize {
        let own = std::mem::size_of::<Expr>();
        match self {
            Expr::Literal(b) | Expr::LiteralCi(b) => own + b.len(),
            Expr::Seq(items) | Expr::Choice(items) => {
                own + items.iter().map(Expr::footprint).sum::<usize>()
            }
            Expr::Literals(m) => own + m.footprint(),
            Expr::Repeat { inner, .. }
            | Expr::Ahead(inner)
            | Expr::NotAhead(inner)
            | Expr::Find { inner, .. } => own + inner.footprint(),
            _ => own,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(bytes) => write!(f, "\"{}\"", escape(bytes)),
            Expr::LiteralCi(bytes) => write!(f, "ci:\"{}\"", escape(bytes)),
            Expr::Set(set) if set.is_negated() => write!(f, "[^...]"),
            Expr::Set(_) => write!(f, "[...]"),
            Expr::Any => write!(f, "."),
            Expr::Start => write!(f, "^"),
            Expr::End => write!(f, "$"),
            Expr::Boundary => write!(f, "~"),
            Expr::Call(id) => write!(f, "<rule {}>", id),
            Expr::Seq(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Expr::Choice(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " / ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Expr::Literals(m) => {
                for (i, lit) in m.literals().enumerate() {
                    if i > 0 {
                        write!(f, " / ")?;
                    }
                    write!(f, "\"{}\"", escape(lit))?;
                }
                Ok(())
            }
            Expr::Repeat { inner, min, max } => match (min, max) {
                (0, None) => write!(f, "{}*", inner),
                (1, None) => write!(f, "{}+", inner),
                (0, Some(1)) => write!(f, "{}?", inner),
                (min, None) => write!(f, "{}{{{},}}", inner, min),
                (min, Some(max)) => write!(f, "{}{{{},{}}}", inner, min, max),
            },
            Expr::Ahead(inner) => write!(f, ">{}", inner),
            Expr::NotAhead(inner) => write!(f, "!{}", inner),
            Expr::Find { inner, all, .. } => {
                write!(f, "{}:{}", if *all { "findall" } else { "find" }, inner)
            }
        }
    }
}

fn escape(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).escape_debug().to_string()
}
