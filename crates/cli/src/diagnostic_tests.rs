// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn display_includes_source_and_position() {
    let d = Diagnostic::at("undefined identifier: foo", Pos { line: 3, column: 7 })
        .with_source("net.rpl");
    assert_eq!(d.to_string(), "net.rpl:3:7: undefined identifier: foo");
}

#[test]
fn display_bare_message() {
    assert_eq!(Diagnostic::new("oops").to_string(), "oops");
}

#[test]
fn with_source_keeps_first_source() {
    let d = Diagnostic::new("x").with_source("a").with_source("b");
    assert_eq!(d.source.as_deref(), Some("a"));
}

#[test]
fn json_round_trip_preserves_fields() {
    let diags = vec![Diagnostic::at("bad", Pos { line: 1, column: 2 })];
    assert_eq!(from_json(&to_json(&diags)), diags);
}

#[test]
fn non_json_text_becomes_message() {
    let diags = from_json(b"plain failure");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "plain failure");
}

#[test]
fn empty_buffer_has_no_diagnostics() {
    assert!(from_json(b"").is_empty());
}
