// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser for package sources and expressions.

use super::ast::{Ast, ImportDecl, Statement, Unit};
use super::lexer::{Tok, Token, tokenize};
use crate::diagnostic::{Diagnostic, Pos};

/// Maximum expression nesting accepted by the parser.
pub const MAX_NESTING: usize = 100;

const KEYWORDS: &[&str] = &["package", "import", "local", "alias"];

static EOF: Tok = Tok::Eof;

/// Parse a complete source unit.
pub fn parse_unit(src: &str) -> Result<Unit, Diagnostic> {
    Parser::new(tokenize(src)?).unit()
}

/// Parse a standalone expression (as given to `compile`).
pub fn parse_expression(src: &str) -> Result<Ast, Diagnostic> {
    let mut parser = Parser::new(tokenize(src)?);
    let ast = parser.choice(true)?;
    match parser.peek() {
        Tok::Eof => Ok(ast),
        other => Err(Diagnostic::at(
            format!("unexpected {} after expression", describe(other)),
            parser.pos(),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            idx: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Tok {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Tok {
        self.tokens
            .get(self.idx + n)
            .or_else(|| self.tokens.last())
            .map(|t| &t.tok)
            .unwrap_or(&EOF)
    }

    fn pos(&self) -> Pos {
        self.tokens
            .get(self.idx)
            .or_else(|| self.tokens.last())
            .map(|t| t.pos)
            .unwrap_or_default()
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Tok::Ident(name) if name == kw)
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok, what: &str) -> Result<(), Diagnostic> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> Diagnostic {
        Diagnostic::at(
            format!("expected {}, found {}", expected, describe(self.peek())),
            self.pos(),
        )
    }

    fn plain_name(&mut self, what: &str) -> Result<String, Diagnostic> {
        let pos = self.pos();
        match self.bump() {
            Tok::Ident(name) if name.contains('.') => Err(Diagnostic::at(
                format!("{} must not be qualified: {}", what, name),
                pos,
            )),
            Tok::Ident(name) if KEYWORDS.contains(&name.as_str()) => Err(Diagnostic::at(
                format!("{} cannot be the keyword '{}'", what, name),
                pos,
            )),
            Tok::Ident(name) => Ok(name),
            other => Err(Diagnostic::at(
                format!("expected {}, found {}", what, describe(&other)),
                pos,
            )),
        }
    }

    fn unit(&mut self) -> Result<Unit, Diagnostic> {
        let mut unit = Unit::default();
        if self.eat_keyword("package") {
            unit.package = Some(self.plain_name("package name")?);
        }
        loop {
            match self.peek() {
                Tok::Eof => return Ok(unit),
                Tok::Ident(kw) if kw == "import" => {
                    self.bump();
                    self.imports(&mut unit.imports)?;
                }
                Tok::Ident(kw) if kw == "package" => {
                    return Err(Diagnostic::at(
                        "package declaration must be the first statement",
                        self.pos(),
                    ));
                }
                _ => unit.statements.push(self.statement()?),
            }
        }
    }

    fn imports(&mut self, out: &mut Vec<ImportDecl>) -> Result<(), Diagnostic> {
        loop {
            let pos = self.pos();
            let path = match self.bump() {
                Tok::Str(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Tok::Ident(first) => {
                    let mut path = first;
                    while self.peek() == &Tok::Slash && matches!(self.peek_at(1), Tok::Ident(_))
                    {
                        self.bump();
                        if let Tok::Ident(part) = self.bump() {
                            path.push('/');
                            path.push_str(&part);
                        }
                    }
                    path
                }
                other => {
                    return Err(Diagnostic::at(
                        format!("expected import path, found {}", describe(&other)),
                        pos,
                    ));
                }
            };
            let alias = if self.eat_keyword("as") {
                Some(self.plain_name("import alias")?)
            } else {
                None
            };
            out.push(ImportDecl { path, alias, pos });
            if !self.eat(&Tok::Comma) {
                return Ok(());
            }
        }
    }

    fn statement(&mut self) -> Result<Statement, Diagnostic> {
        let pos = self.pos();
        let local = self.eat_keyword("local");
        let alias = self.eat_keyword("alias");
        if !matches!(self.peek(), Tok::Ident(_)) || self.peek_at(1) != &Tok::Eq {
            return Err(self.unexpected("a definition (name = expression)"));
        }
        let name = self.plain_name("definition name")?;
        self.expect(Tok::Eq, "'='")?;
        let body = self.choice(true)?;
        Ok(Statement {
            name,
            local,
            alias,
            body,
            pos,
        })
    }

    /// True where a sequence must stop: closing tokens, `/`, or the start of
    /// the next statement.
    fn at_sequence_end(&self) -> bool {
        match self.peek() {
            Tok::Eof | Tok::RParen | Tok::RBrace | Tok::Slash => true,
            Tok::Ident(name) => {
                KEYWORDS.contains(&name.as_str()) || self.peek_at(1) == &Tok::Eq
            }
            _ => false,
        }
    }

    fn enter(&mut self) -> Result<(), Diagnostic> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(Diagnostic::at(
                format!("expression nested more than {} levels deep", MAX_NESTING),
                self.pos(),
            ));
        }
        Ok(())
    }

    fn choice(&mut self, cooked: bool) -> Result<Ast, Diagnostic> {
        self.enter()?;
        let mut alts = vec![self.sequence(cooked)?];
        while self.eat(&Tok::Slash) {
            alts.push(self.sequence(cooked)?);
        }
        self.depth -= 1;
        Ok(match alts.len() {
            1 => alts.remove(0),
            _ => Ast::Choice(alts),
        })
    }

    fn sequence(&mut self, cooked: bool) -> Result<Ast, Diagnostic> {
        let mut items = Vec::new();
        while !self.at_sequence_end() {
            items.push(self.predicate()?);
        }
        match items.len() {
            0 => Err(self.unexpected("an expression")),
            1 => Ok(items.remove(0)),
            _ => Ok(Ast::Seq { items, cooked }),
        }
    }

    fn predicate(&mut self) -> Result<Ast, Diagnostic> {
        if self.eat(&Tok::Bang) {
            self.enter()?;
            let inner = self.predicate()?;
            self.depth -= 1;
            return Ok(Ast::NotAhead(Box::new(inner)));
        }
        if self.eat(&Tok::Gt) {
            self.enter()?;
            let inner = self.predicate()?;
            self.depth -= 1;
            return Ok(Ast::Ahead(Box::new(inner)));
        }
        self.quantified()
    }

    fn quantified(&mut self) -> Result<Ast, Diagnostic> {
        let mut ast = self.atom()?;
        loop {
            let (min, max) = match self.peek() {
                Tok::Star => (0, None),
                Tok::Plus => (1, None),
                Tok::Question => (0, Some(1)),
                Tok::LBrace { adjacent: true }
                    if matches!(self.peek_at(1), Tok::Number(_) | Tok::Comma) =>
                {
                    self.bump();
                    let bounds = self.bounds()?;
                    ast = Ast::Repeat {
                        inner: Box::new(ast),
                        min: bounds.0,
                        max: bounds.1,
                    };
                    continue;
                }
                _ => return Ok(ast),
            };
            self.bump();
            ast = Ast::Repeat {
                inner: Box::new(ast),
                min,
                max,
            };
        }
    }

    /// After `{`: `n}`, `n,}`, `n,m}`, `,m}`.
    fn bounds(&mut self) -> Result<(u32, Option<u32>), Diagnostic> {
        let pos = self.pos();
        let min = match self.peek() {
            Tok::Number(n) => {
                let n = *n;
                self.bump();
                Some(n)
            }
            _ => None,
        };
        let max = if self.eat(&Tok::Comma) {
            match self.peek() {
                Tok::Number(n) => {
                    let n = *n;
                    self.bump();
                    Some(n)
                }
                _ => None,
            }
        } else {
            min
        };
        self.expect(Tok::RBrace, "'}' to close repetition")?;
        let min = min.unwrap_or(0);
        if let Some(max) = max {
            if max < min {
                return Err(Diagnostic::at(
                    format!("repetition bounds out of order: {{{},{}}}", min, max),
                    pos,
                ));
            }
        }
        Ok((min, max))
    }

    fn atom(&mut self) -> Result<Ast, Diagnostic> {
        let pos = self.pos();
        match self.bump() {
            Tok::Str(bytes) => Ok(Ast::Literal(bytes)),
            Tok::Set(set) => Ok(Ast::Set(set)),
            Tok::Dot => Ok(Ast::Any),
            Tok::Caret => Ok(Ast::Start),
            Tok::Dollar => Ok(Ast::End),
            Tok::Tilde => Ok(Ast::Boundary),
            Tok::Ident(name) => reference(name, pos),
            Tok::LParen => {
                let inner = self.choice(true)?;
                self.expect(Tok::RParen, "')'")?;
                Ok(inner)
            }
            Tok::LBrace { .. } => {
                let inner = self.choice(false)?;
                self.expect(Tok::RBrace, "'}'")?;
                Ok(inner)
            }
            Tok::Macro(name) => {
                self.enter()?;
                let inner = Box::new(self.atom()?);
                self.depth -= 1;
                match name.as_str() {
                    "find" => Ok(Ast::Find { inner, all: false }),
                    "findall" => Ok(Ast::Find { inner, all: true }),
                    "ci" => Ok(Ast::CaseInsensitive(inner)),
                    other => Err(Diagnostic::at(format!("unknown macro '{}:'", other), pos)),
                }
            }
            other => Err(Diagnostic::at(
                format!("expected an expression, found {}", describe(&other)),
                pos,
            )),
        }
    }
}

fn reference(name: String, pos: Pos) -> Result<Ast, Diagnostic> {
    match name.split_once('.') {
        None => Ok(Ast::Ref {
            package: None,
            name,
            pos,
        }),
        Some((pkg, local)) if !local.contains('.') => Ok(Ast::Ref {
            package: Some(pkg.to_string()),
            name: local.to_string(),
            pos,
        }),
        Some(_) => Err(Diagnostic::at(
            format!("identifier has too many qualifiers: {}", name),
            pos,
        )),
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Ident(name) => format!("identifier '{}'", name),
        Tok::Macro(name) => format!("'{}:'", name),
        Tok::Str(_) => "string literal".to_string(),
        Tok::Set(_) => "character set".to_string(),
        Tok::Number(n) => format!("number {}", n),
        Tok::Eof => "end of input".to_string(),
        Tok::Dot => "'.'".to_string(),
        Tok::Caret => "'^'".to_string(),
        Tok::Dollar => "'$'".to_string(),
        Tok::Tilde => "'~'".to_string(),
        Tok::LParen => "'('".to_string(),
        Tok::RParen => "')'".to_string(),
        Tok::LBrace { .. } => "'{'".to_string(),
        Tok::RBrace => "'}'".to_string(),
        Tok::Slash => "'/'".to_string(),
        Tok::Star => "'*'".to_string(),
        Tok::Plus => "'+'".to_string(),
        Tok::Question => "'?'".to_string(),
        Tok::Bang => "'!'".to_string(),
        Tok::Gt => "'>'".to_string(),
        Tok::Eq => "'='".to_string(),
        Tok::Comma => "','".to_string(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
