// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::pattern::Capture;

#[test]
fn palette_falls_back_to_package_then_default() {
    let palette = Palette::default();
    assert_eq!(palette.color_for("num"), codes::CYAN);
    assert_eq!(palette.color_for("num.int"), codes::CYAN);
    assert_eq!(palette.color_for("other"), codes::GREEN);
}

#[test]
fn palette_accepts_names_and_codes() {
    let mut palette = Palette::default();
    palette.set("num.int", "magenta").unwrap();
    palette.set("default", "208").unwrap();
    assert_eq!(palette.color_for("num.int"), codes::MAGENTA);
    assert_eq!(palette.color_for("num.float"), codes::CYAN);
    assert_eq!(palette.color_for("x"), 208);
    assert!(palette.set("x", "chartreuse").is_err());
}

#[test]
fn color_wraps_leaves_and_keeps_gaps() {
    let capture = Capture {
        name: "*",
        start: 0,
        end: 5,
        subs: vec![Capture {
            name: "num",
            start: 3,
            end: 5,
            subs: vec![],
        }],
    };
    let palette = Palette::default();
    let m = Encoding {
        input: b"id 42!",
        capture: &capture,
        palette: &palette,
    };
    let Encoded::Bytes(out) = Color.encode(&m).unwrap() else {
        panic!("expected bytes");
    };
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("id "));
    assert!(out.contains("\x1b[38;5;6m42"));
    assert!(out.ends_with("\x1b[0m!"));
}
