// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tokenizer for pattern sources.

use super::charset::CharSet;
use crate::diagnostic::{Diagnostic, Pos};

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    /// Plain identifier, possibly qualified (`pkg.name`).
    Ident(String),
    /// `name:` prefix such as `find:`.
    Macro(String),
    Str(Vec<u8>),
    Set(CharSet),
    Number(u32),
    Dot,
    Caret,
    Dollar,
    Tilde,
    LParen,
    RParen,
    /// `{`; `adjacent` is true when no whitespace precedes it.
    LBrace { adjacent: bool },
    RBrace,
    Slash,
    Star,
    Plus,
    Question,
    Bang,
    Gt,
    Eq,
    Comma,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub tok: Tok,
    pub pos: Pos,
}

/// Split `src` into tokens, stopping at the first lexical error.
pub fn tokenize(src: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    column: u32,
    /// Whether the previous character consumed was whitespace or a comment.
    after_space: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
            column: 1,
            after_space: true,
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.chars.clone();
        it.next();
        it.next()
    }

    fn run(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut out = Vec::new();
        loop {
            let spaced = self.skip_trivia();
            let pos = self.pos();
            let Some(c) = self.peek() else {
                out.push(Token { tok: Tok::Eof, pos });
                return Ok(out);
            };
            let tok = match c {
                '"' => Tok::Str(self.string()?),
                '[' => Tok::Set(self.set()?),
                '0'..='9' => Tok::Number(self.number()?),
                c if is_ident_start(c) => self.ident(),
                _ => {
                    self.bump();
                    match c {
                        '.' => Tok::Dot,
                        '^' => Tok::Caret,
                        '$' => Tok::Dollar,
                        '~' => Tok::Tilde,
                        '(' => Tok::LParen,
                        ')' => Tok::RParen,
                        '{' => Tok::LBrace { adjacent: !spaced },
                        '}' => Tok::RBrace,
                        '/' => Tok::Slash,
                        '*' => Tok::Star,
                        '+' => Tok::Plus,
                        '?' => Tok::Question,
                        '!' => Tok::Bang,
                        '>' => Tok::Gt,
                        '=' => Tok::Eq,
                        ',' => Tok::Comma,
                        other => {
                            return Err(Diagnostic::at(
                                format!("unexpected character '{}'", other),
                                pos,
                            ));
                        }
                    }
                }
            };
            self.after_space = false;
            out.push(Token { tok, pos });
        }
    }

    /// Skip whitespace and `--` comments; returns true if anything was skipped
    /// or the previous token was preceded by the start of input.
    fn skip_trivia(&mut self) -> bool {
        let mut skipped = self.after_space;
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                    skipped = true;
                }
                Some('-') if self.peek2() == Some('-') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                    skipped = true;
                }
                _ => return skipped,
            }
        }
    }

    fn ident(&mut self) -> Tok {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                name.push(c);
                self.bump();
            } else if c == '.' && self.peek2().is_some_and(is_ident_start) {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if self.peek() == Some(':') {
            self.bump();
            return Tok::Macro(name);
        }
        Tok::Ident(name)
    }

    fn number(&mut self) -> Result<u32, Diagnostic> {
        let pos = self.pos();
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            digits.push(c);
            self.bump();
        }
        digits
            .parse()
            .map_err(|_| Diagnostic::at(format!("number out of range: {}", digits), pos))
    }

    fn string(&mut self) -> Result<Vec<u8>, Diagnostic> {
        let start = self.pos();
        self.bump();
        let mut out = Vec::new();
        loop {
            let pos = self.pos();
            match self.bump() {
                None | Some('\n') => {
                    return Err(Diagnostic::at("unterminated string literal", start));
                }
                Some('"') => return Ok(out),
                Some('\\') => self.escape(pos, &mut out)?,
                Some(c) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    fn escape(&mut self, pos: Pos, out: &mut Vec<u8>) -> Result<(), Diagnostic> {
        match self.bump() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('\\') => out.push(b'\\'),
            Some('"') => out.push(b'"'),
            Some(']') => out.push(b']'),
            Some('-') => out.push(b'-'),
            Some('^') => out.push(b'^'),
            Some('x') => {
                let hi = self.bump().and_then(|c| c.to_digit(16));
                let lo = self.bump().and_then(|c| c.to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi * 16 + lo) as u8),
                    _ => return Err(Diagnostic::at("invalid \\x escape", pos)),
                }
            }
            Some(other) => {
                return Err(Diagnostic::at(
                    format!("invalid escape sequence '\\{}'", other),
                    pos,
                ));
            }
            None => return Err(Diagnostic::at("unterminated escape", pos)),
        }
        Ok(())
    }

    /// `[a-z]`, `[^abc]`, `[:digit:]`, `[[:alpha:]_]`
    fn set(&mut self) -> Result<CharSet, Diagnostic> {
        let start = self.pos();
        self.bump();
        let mut set = CharSet::new();
        if self.peek() == Some(':') {
            let class = self.named_class(start)?;
            self.expect_close(start)?;
            return Ok(class);
        }
        if self.peek() == Some('^') {
            self.bump();
            set.negate();
        }
        loop {
            let pos = self.pos();
            let c = match self.bump() {
                None | Some('\n') => {
                    return Err(Diagnostic::at("unterminated character set", start));
                }
                Some(']') => return Ok(set),
                Some('[') if self.peek() == Some(':') => {
                    let class = self.named_class(pos)?;
                    self.expect_close(pos)?;
                    set.extend(&class);
                    continue;
                }
                Some('\\') => self.set_escape(pos)?,
                Some(c) => c,
            };
            if self.peek() == Some('-') && self.peek2().is_some_and(|n| n != ']') {
                self.bump();
                let hi = match self.bump() {
                    Some('\\') => self.set_escape(pos)?,
                    Some(hi) => hi,
                    None => return Err(Diagnostic::at("unterminated character set", start)),
                };
                if hi < c {
                    return Err(Diagnostic::at(
                        format!("invalid range {}-{}", c, hi),
                        pos,
                    ));
                }
                set.push_range(c, hi);
            } else {
                set.push_char(c);
            }
        }
    }

    fn set_escape(&mut self, pos: Pos) -> Result<char, Diagnostic> {
        let mut bytes = Vec::new();
        self.escape(pos, &mut bytes)?;
        match bytes.as_slice() {
            [b] => Ok(char::from(*b)),
            _ => Err(Diagnostic::at("invalid escape in character set", pos)),
        }
    }

    /// After `[`, parse `:name:` (the trailing `]` is left for the caller).
    fn named_class(&mut self, pos: Pos) -> Result<CharSet, Diagnostic> {
        self.bump();
        let mut negated = false;
        if self.peek() == Some('^') {
            self.bump();
            negated = true;
        }
        let mut name = String::new();
        loop {
            match self.bump() {
                Some(':') => break,
                Some(c) if c.is_ascii_alphabetic() => name.push(c),
                _ => return Err(Diagnostic::at("malformed named character class", pos)),
            }
        }
        let mut class = CharSet::named(&name).ok_or_else(|| {
            let known: Vec<_> = CharSet::class_names().collect();
            Diagnostic::at(
                format!(
                    "unknown character class [:{}:] (known: {})",
                    name,
                    known.join(", ")
                ),
                pos,
            )
        })?;
        if negated {
            class.negate();
        }
        Ok(class)
    }

    fn expect_close(&mut self, pos: Pos) -> Result<(), Diagnostic> {
        match self.bump() {
            Some(']') => Ok(()),
            _ => Err(Diagnostic::at("expected ']' after character class", pos)),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
