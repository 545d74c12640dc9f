// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn engine() -> Engine {
    Engine::new(None).unwrap()
}

fn compiled(engine: &mut Engine, source: &str) -> PatternId {
    let report = engine.compile(source);
    assert!(report.messages.is_empty(), "{:?}", report.messages);
    report.id.unwrap()
}

#[test]
fn boolean_match_reports_leftover() {
    let mut e = engine();
    let id = compiled(&mut e, "{[0-9]+}");
    let report = e.match_input(id, b"42 apples", 1, "bool").unwrap();
    assert_eq!(report.outcome, Outcome::BooleanMatch);
    assert_eq!(report.leftover, 7);
    assert!(!report.abend);
    assert!(report.matched());
}

#[test]
fn no_match_leftover_counts_from_start() {
    let mut e = engine();
    let id = compiled(&mut e, "[0-9]+");
    let report = e.match_input(id, b"apples", 3, "json").unwrap();
    assert_eq!(report.outcome, Outcome::NoMatch);
    assert_eq!(report.leftover, 4);
}

#[test]
fn unknown_encoder_and_pattern_are_outcomes() {
    let mut e = engine();
    let id = compiled(&mut e, "\"a\"");
    let report = e.match_input(id, b"a", 1, "bogus").unwrap();
    assert_eq!(report.outcome, Outcome::InvalidEncoder);

    assert!(e.free_pattern(id));
    let report = e.match_input(id, b"a", 1, "json").unwrap();
    assert_eq!(report.outcome, Outcome::InvalidPattern);
    assert!(!e.free_pattern(id));
}

#[test]
fn start_beyond_input_is_no_match() {
    let mut e = engine();
    let id = compiled(&mut e, "$");
    assert!(e.match_input(id, b"ab", 3, "bool").unwrap().matched());
    let report = e.match_input(id, b"ab", 4, "bool").unwrap();
    assert_eq!(report.outcome, Outcome::NoMatch);
    assert_eq!(report.leftover, 0);
}

#[test]
fn start_offset_clamps_low_values() {
    assert_eq!(start_offset(-5, 3), Some(0));
    assert_eq!(start_offset(0, 3), Some(0));
    assert_eq!(start_offset(2, 3), Some(1));
    assert_eq!(start_offset(4, 3), Some(3));
    assert_eq!(start_offset(5, 3), None);
}

#[test]
fn json_payload_uses_one_based_positions() {
    let mut e = engine();
    let id = compiled(&mut e, "[a-z]+");
    let report = e.match_input(id, b"abc1", 1, "json").unwrap();
    let Outcome::Payload(bytes) = report.outcome else {
        panic!("expected payload");
    };
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["type"], "*");
    assert_eq!(value["s"], 1);
    assert_eq!(value["e"], 4);
    assert_eq!(value["data"], "abc");
    assert_eq!(report.leftover, 1);
}

#[test]
fn compile_errors_return_messages() {
    let mut e = engine();
    let report = e.compile("undefined_thing");
    assert_eq!(report.id, None);
    assert!(report.messages[0].message.contains("undefined identifier"));
}

#[test]
fn compiling_twice_gives_distinct_equivalent_patterns() {
    let mut e = engine();
    let a = compiled(&mut e, "[0-9]+");
    let b = compiled(&mut e, "[0-9]+");
    assert_ne!(a, b);
    let ra = e.match_input(a, b"123x", 1, "line").unwrap();
    let rb = e.match_input(b, b"123x", 1, "line").unwrap();
    assert_eq!(ra.outcome, rb.outcome);
    assert_eq!(ra.leftover, rb.leftover);
}

#[test]
fn patterns_survive_later_loads() {
    let mut e = engine();
    assert!(e.load("d = [0-9]").ok);
    let id = compiled(&mut e, "d");
    assert!(e.load("d = [a-z]").ok);
    assert!(e.match_input(id, b"7", 1, "bool").unwrap().matched());
    assert!(!e.match_input(id, b"x", 1, "bool").unwrap().matched());
}

#[test]
fn import_builtin_package_then_compile() {
    let mut e = engine();
    let report = e.import("num", None);
    assert!(report.ok, "{:?}", report.messages);
    assert_eq!(report.package.as_deref(), Some("num"));
    let id = compiled(&mut e, "num.int");
    let Outcome::Payload(bytes) = e.match_input(id, b"-12", 1, "json").unwrap().outcome else {
        panic!("expected payload");
    };
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["type"], "num.int");
}

#[test]
fn import_missing_package_fails_cleanly() {
    let mut e = engine();
    let report = e.import("nonexistent.pkg", None);
    assert!(!report.ok);
    assert!(!report.messages.is_empty());
}

#[test]
fn alloc_limit_rejects_small_values() {
    let mut e = engine();
    assert!(e.set_alloc_limit(1).is_err());
    assert!(e.set_alloc_limit(MIN_ALLOC_LIMIT_KB - 1).is_err());
    e.set_alloc_limit(MIN_ALLOC_LIMIT_KB).unwrap();
    assert_eq!(e.alloc_limit().0, MIN_ALLOC_LIMIT_KB);
    e.set_alloc_limit(0).unwrap();
    assert_eq!(e.alloc_limit().0, 0);
}

#[test]
fn usage_grows_with_compiled_patterns() {
    let mut e = engine();
    let (_, before) = e.alloc_limit();
    for _ in 0..64 {
        compiled(&mut e, "{\"alpha\" / \"beta\" / \"gamma\"} [a-z]+ [0-9]*");
    }
    let (_, after) = e.alloc_limit();
    assert!(after > before);
}

#[test]
fn libpath_round_trips() {
    let mut e = engine();
    e.set_libpath("/one:/two");
    assert_eq!(e.libpath(), "/one:/two");
    assert_eq!(e.libpath_dirs().len(), 2);
    assert_eq!(e.config().get("libpath_source"), Some("set"));
}

#[test]
fn config_lists_encoders_and_styles() {
    let e = engine();
    let config = e.config();
    assert!(config.get("encoders").unwrap().split(',').any(|n| n == "json"));
    assert!(config.get("trace_styles").unwrap().contains("condensed"));
    assert_eq!(config.get("version"), Some(env!("CARGO_PKG_VERSION")));
    assert_eq!(config.get("nonexistent"), None);
}

#[test]
fn trace_reports_invalid_inputs() {
    let mut e = engine();
    let id = compiled(&mut e, "\"a\"");
    assert_eq!(e.trace(id, b"a", 1, "nope"), TraceOutcome::InvalidStyle);
    e.free_pattern(id);
    assert_eq!(e.trace(id, b"a", 1, "full"), TraceOutcome::InvalidPattern);
}

#[test]
fn trace_agrees_with_match() {
    let mut e = engine();
    let id = compiled(&mut e, "{[a-z]+ [0-9]}");
    for input in [&b"abc 1"[..], b"abc", b"1"] {
        let matched = e.match_input(id, input, 1, "bool").unwrap().matched();
        let TraceOutcome::Traced { matched: traced, trace } = e.trace(id, input, 1, "condensed")
        else {
            panic!("expected trace");
        };
        assert_eq!(matched, traced);
        assert!(!trace.is_empty());
    }
}

#[test]
fn finalize_releases_every_pattern() {
    let mut e = engine();
    let a = compiled(&mut e, "\"a\"");
    compiled(&mut e, "\"b\"");
    assert_eq!(e.finalize(), 2);
    assert!(e.pattern(a).is_none());
}
