// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern source language.
//!
//! A small PEG notation: literals, character sets, references to named
//! definitions, cooked `( )` and raw `{ }` sequences, ordered choice `/`,
//! repetition, look-ahead predicates and the `find:`/`findall:`/`ci:` macros.

pub mod ast;
pub mod charset;
pub mod lexer;
pub mod parser;

pub use ast::{Ast, ImportDecl, Statement, Unit};
pub use charset::CharSet;
pub use parser::{parse_expression, parse_unit};
