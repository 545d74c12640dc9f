// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use termcolor::Color;

// NO_COLOR and COLOR are exercised in tests/specs.rs; env var manipulation
// is not safe in parallel unit tests.

#[test]
fn default_encoder_follows_color_choice() {
    assert_eq!(default_encoder(ColorChoice::Never), "matches");
    assert_eq!(default_encoder(ColorChoice::Always), "color");
    assert_eq!(default_encoder(ColorChoice::Auto), "color");
}

#[test]
fn scheme_error_is_red_bold() {
    let spec = scheme::error();
    assert_eq!(spec.fg(), Some(&Color::Red));
    assert!(spec.bold());
}

#[test]
fn scheme_location_is_cyan() {
    assert_eq!(scheme::location().fg(), Some(&Color::Cyan));
}

#[test]
fn scheme_name_is_bold_without_color() {
    let spec = scheme::name();
    assert!(spec.bold());
    assert!(spec.fg().is_none());
}

#[test]
fn scheme_description_is_dimmed() {
    assert!(scheme::description().dimmed());
}
