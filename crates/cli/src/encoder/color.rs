// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `color` encoder: the input with each leaf capture highlighted.

use std::collections::HashMap;
use std::io::Write;

use termcolor::{Ansi, ColorSpec, WriteColor};

use super::{EncodeError, Encoded, Encoder, Encoding};

/// ANSI 256-color codes used by the default palette.
pub mod codes {
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;
    pub const BLACK: u8 = 0;
}

/// Maps capture types to colors.
///
/// Lookup order: the exact type, then its package (`net` for `net.ipv4`),
/// then the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<String, u8>,
    fallback: u8,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            ("num", codes::CYAN),
            ("net", codes::RED),
            ("date", codes::BLUE),
            ("word", codes::YELLOW),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            colors,
            fallback: codes::GREEN,
        }
    }
}

impl Palette {
    pub fn color_for(&self, kind: &str) -> u8 {
        if let Some(code) = self.colors.get(kind) {
            return *code;
        }
        kind.split_once('.')
            .and_then(|(pkg, _)| self.colors.get(pkg))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Assign `color` (a name or a 0-255 code) to `kind`; `"default"` sets
    /// the fallback.
    pub fn set(&mut self, kind: &str, color: &str) -> Result<(), String> {
        let code = parse_color(color).ok_or_else(|| format!("unknown color '{color}'"))?;
        if kind == "default" {
            self.fallback = code;
        } else {
            self.colors.insert(kind.to_string(), code);
        }
        Ok(())
    }
}

fn parse_color(name: &str) -> Option<u8> {
    let code = match name {
        "black" => codes::BLACK,
        "red" => codes::RED,
        "green" => codes::GREEN,
        "yellow" => codes::YELLOW,
        "blue" => codes::BLUE,
        "magenta" => codes::MAGENTA,
        "cyan" => codes::CYAN,
        "white" => codes::WHITE,
        other => return other.parse().ok(),
    };
    Some(code)
}

pub(super) struct Color;

impl Encoder for Color {
    fn name(&self) -> &'static str {
        "color"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        let mut out = Ansi::new(Vec::with_capacity(m.input.len() + 32));
        let mut cursor = 0;
        for leaf in m.capture.leaves() {
            out.write_all(m.input.get(cursor..leaf.start).unwrap_or_default())?;
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(termcolor::Color::Ansi256(m.palette.color_for(leaf.name))));
            out.set_color(&spec)?;
            out.write_all(leaf.text(m.input))?;
            out.reset()?;
            cursor = leaf.end;
        }
        out.write_all(m.input.get(cursor..).unwrap_or_default())?;
        Ok(Encoded::Bytes(out.into_inner()))
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
