// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled patterns and the matching runtime.
//!
//! Literal fast paths follow a simple hierarchy:
//! - Leading literal of a `find:` target: memchr::memmem
//! - Ordered choice of literals: aho-corasick
//! - Everything else: the backtracking interpreter in [`vm`]

pub mod capture;
pub mod expr;
pub mod matcher;
pub mod program;
pub mod trace;
pub mod vm;

pub use capture::Capture;
pub use expr::{Expr, Rule, RuleId};
pub use program::{ANONYMOUS, Program};
pub use trace::{TraceStyle, Tracer};
pub use vm::{Abend, Limits, RunResult};
