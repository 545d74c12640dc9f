// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Syntax tree for pattern sources and expressions.

use super::charset::CharSet;
use crate::diagnostic::Pos;

/// A parsed source unit (one `load`, one file, one imported package).
#[derive(Debug, Clone, Default)]
pub struct Unit {
    /// Declared package name, if any.
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub statements: Vec<Statement>,
}

/// `import a/b as c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub alias: Option<String>,
    pub pos: Pos,
}

/// `[local] [alias] name = body`
#[derive(Debug, Clone)]
pub struct Statement {
    pub name: String,
    pub local: bool,
    pub alias: bool,
    pub body: Ast,
    pub pos: Pos,
}

/// Pattern expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Literal(Vec<u8>),
    Set(CharSet),
    Any,
    Start,
    End,
    Boundary,
    Ref {
        package: Option<String>,
        name: String,
        pos: Pos,
    },
    Seq {
        items: Vec<Ast>,
        cooked: bool,
    },
    Choice(Vec<Ast>),
    Repeat {
        inner: Box<Ast>,
        min: u32,
        max: Option<u32>,
    },
    Ahead(Box<Ast>),
    NotAhead(Box<Ast>),
    Find {
        inner: Box<Ast>,
        all: bool,
    },
    CaseInsensitive(Box<Ast>),
}

impl Ast {
    /// The referenced name, when this node is a bare reference.
    pub fn as_ref_name(&self) -> Option<(Option<&str>, &str)> {
        match self {
            Ast::Ref { package, name, .. } => Some((package.as_deref(), name.as_str())),
            _ => None,
        }
    }
}
