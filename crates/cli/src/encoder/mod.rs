// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output encoders.
//!
//! An encoder turns a successful match into the bytes returned to the
//! caller. The registry is built once per process and looked up by name on
//! every match.

pub mod color;
pub mod tree;

use crate::pattern::Capture;

pub use color::Palette;

/// A successful match handed to an encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoding<'a, 'p> {
    pub input: &'a [u8],
    pub capture: &'a Capture<'p>,
    pub palette: &'a Palette,
}

/// Encoder result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// Match succeeded but the encoder produces no data.
    Boolean,
    Bytes(Vec<u8>),
}

/// Failure while serializing a match.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding failed: {0}")]
    Binary(#[from] postcard::Error),

    #[error("color encoding failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A named output encoder.
pub trait Encoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError>;
}

/// The set of encoders available to every engine.
pub struct Registry {
    encoders: Vec<Box<dyn Encoder>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Registry {
    /// Registry holding every built-in encoder.
    pub fn builtin() -> Self {
        Self {
            encoders: vec![
                Box::new(tree::Json),
                Box::new(Bool),
                Box::new(Line),
                Box::new(Matches),
                Box::new(Subs),
                Box::new(color::Color),
                Box::new(tree::Byte),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Encoder> {
        self.encoders
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.encoders.iter().map(|e| e.name())
    }
}

/// Reports only that the pattern matched.
struct Bool;

impl Encoder for Bool {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn encode(&self, _m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        Ok(Encoded::Boolean)
    }
}

/// The whole input record.
struct Line;

impl Encoder for Line {
    fn name(&self) -> &'static str {
        "line"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        Ok(Encoded::Bytes(m.input.to_vec()))
    }
}

/// The matched text.
struct Matches;

impl Encoder for Matches {
    fn name(&self) -> &'static str {
        "matches"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        Ok(Encoded::Bytes(m.capture.text(m.input).to_vec()))
    }
}

/// Text of each direct sub-capture, one per line.
struct Subs;

impl Encoder for Subs {
    fn name(&self) -> &'static str {
        "subs"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        let parts: Vec<&[u8]> = m.capture.subs.iter().map(|s| s.text(m.input)).collect();
        Ok(Encoded::Bytes(parts.join(&b'\n')))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
