// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolution of parsed expressions into runtime expressions.
//!
//! Names become rule ids, cooked sequences gain token boundaries, `ci:`
//! is pushed down into literals and sets, and literal-only choices and
//! `find:` targets pick up their fast paths.

use super::namespace::{Binding, Env, Package};
use crate::diagnostic::{Diagnostic, Pos};
use crate::pattern::Expr;
use crate::pattern::matcher::{LiteralMatcher, MultiLiteralMatcher};
use crate::syntax::Ast;

/// Names visible to an expression.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub env: &'a Env,
    pub packages: &'a [Package],
}

/// Resolve `ast` against `scope`.
pub fn resolve(ast: &Ast, scope: Scope<'_>) -> Result<Expr, Diagnostic> {
    expr(ast, scope, false)
}

fn expr(ast: &Ast, scope: Scope<'_>, ci: bool) -> Result<Expr, Diagnostic> {
    Ok(match ast {
        Ast::Literal(bytes) if ci && bytes.iter().any(u8::is_ascii_alphabetic) => {
            Expr::LiteralCi(bytes.to_ascii_lowercase().into())
        }
        Ast::Literal(bytes) => Expr::Literal(bytes.as_slice().into()),
        Ast::Set(set) if ci => Expr::Set(set.case_folded()),
        Ast::Set(set) => Expr::Set(set.clone()),
        Ast::Any => Expr::Any,
        Ast::Start => Expr::Start,
        Ast::End => Expr::End,
        Ast::Boundary => Expr::Boundary,
        Ast::Ref { package, name, pos } => Expr::Call(lookup(scope, package.as_deref(), name, *pos)?),
        Ast::Seq { items, cooked } => {
            let mut out = Vec::with_capacity(items.len() * 2);
            for (i, item) in items.iter().enumerate() {
                if *cooked && i > 0 {
                    out.push(Expr::Boundary);
                }
                out.push(expr(item, scope, ci)?);
            }
            Expr::Seq(out)
        }
        Ast::Choice(alts) => choice(
            alts.iter()
                .map(|alt| expr(alt, scope, ci))
                .collect::<Result<_, _>>()?,
        ),
        Ast::Repeat { inner, min, max } => Expr::Repeat {
            inner: Box::new(expr(inner, scope, ci)?),
            min: *min,
            max: *max,
        },
        Ast::Ahead(inner) => Expr::Ahead(Box::new(expr(inner, scope, ci)?)),
        Ast::NotAhead(inner) => Expr::NotAhead(Box::new(expr(inner, scope, ci)?)),
        Ast::Find { inner, all } => {
            let inner = expr(inner, scope, ci)?;
            let prefix = inner.leading_literal().map(LiteralMatcher::new);
            Expr::Find {
                inner: Box::new(inner),
                all: *all,
                prefix,
            }
        }
        Ast::CaseInsensitive(inner) => expr(inner, scope, true)?,
    })
}

/// Ordered choice, compiled to one automaton when every alternative is a
/// non-empty literal of the same case sensitivity.
fn choice(alts: Vec<Expr>) -> Expr {
    let ci = matches!(alts.first(), Some(Expr::LiteralCi(_)));
    let literals: Option<Vec<&[u8]>> = alts
        .iter()
        .map(|alt| match alt {
            Expr::Literal(b) if !b.is_empty() && (!ci || !b.iter().any(u8::is_ascii_alphabetic)) => {
                Some(&**b)
            }
            Expr::LiteralCi(b) if ci && !b.is_empty() => Some(&**b),
            _ => None,
        })
        .collect();
    let matcher = literals
        .filter(|lits| lits.len() >= 2)
        .map(|lits| MultiLiteralMatcher::new(&lits, ci));
    match matcher {
        Some(Ok(matcher)) => Expr::Literals(matcher),
        Some(Err(err)) => {
            tracing::debug!(%err, "literal choice left uncompiled");
            Expr::Choice(alts)
        }
        None => Expr::Choice(alts),
    }
}

fn lookup(scope: Scope<'_>, package: Option<&str>, name: &str, pos: Pos) -> Result<usize, Diagnostic> {
    let Some(package) = package else {
        return match scope.env.get(name) {
            Some(Binding::Rule { id, .. }) => Ok(id),
            Some(Binding::Package(_)) => Err(Diagnostic::at(
                format!("'{name}' is a package, not a pattern"),
                pos,
            )),
            None => Err(Diagnostic::at(format!("undefined identifier: {name}"), pos)),
        };
    };
    let pkg = match scope.env.get(package) {
        Some(Binding::Package(id)) => scope.packages.get(id),
        Some(Binding::Rule { .. }) => {
            return Err(Diagnostic::at(
                format!("'{package}' is a pattern, not a package"),
                pos,
            ));
        }
        None => None,
    };
    let Some(pkg) = pkg else {
        return Err(Diagnostic::at(
            format!("undefined package: {package} (is it imported?)"),
            pos,
        ));
    };
    match pkg.env.get(name) {
        Some(Binding::Rule { id, local: false }) => Ok(id),
        Some(Binding::Rule { local: true, .. }) => Err(Diagnostic::at(
            format!("'{name}' is local to package {}", pkg.name),
            pos,
        )),
        Some(Binding::Package(_)) | None => Err(Diagnostic::at(
            format!("package {} has no pattern named '{name}'", pkg.name),
            pos,
        )),
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
