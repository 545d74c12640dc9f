// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Quarry: a PEG pattern-matching engine with a buffer-based host
//! interface.
//!
//! - [`engine::Engine`]: one isolated namespace and pattern table
//! - [`host`]: status-code entry points for embedders
//! - [`api::Session`]: the caller API built on [`host`]

pub mod api;
pub mod buffer;
pub mod cli;
pub mod color;
pub mod diagnostic;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod host;
pub mod loader;
pub mod matchfile;
pub mod pattern;
pub mod rcfile;
pub mod reader;
pub mod runtime;
pub mod syntax;
pub mod table;

pub use api::{Match, MatchData, Pattern, Session};
pub use buffer::StrBuf;
pub use diagnostic::Diagnostic;
pub use engine::{Engine, Fault, Outcome};
pub use error::{Error, ExitCode, Result};
