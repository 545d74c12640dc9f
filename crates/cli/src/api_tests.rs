// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use yare::parameterized;

use super::*;

fn session() -> Session {
    Session::new(None).unwrap()
}

fn pattern(s: &Session, expression: &str) -> Pattern {
    let (pattern, messages) = s.compile(expression).unwrap();
    assert!(messages.is_empty(), "{messages:?}");
    pattern.unwrap()
}

#[test]
fn numeric_pattern_on_apples() {
    let s = session();
    let p = pattern(&s, "{[0-9]+}");
    let m = s.match_input(&p, b"42 apples", 1, "bool").unwrap();
    assert_eq!(m.data, MatchData::Matched);
    assert_eq!(m.leftover, 7);
    assert!(!m.abend);
}

#[test]
fn bogus_encoder_is_invalid_encoder() {
    let s = session();
    let p = pattern(&s, "{[0-9]+}");
    let err = s.match_input(&p, b"42", 1, "bogus").unwrap_err();
    assert!(matches!(err, Error::InvalidEncoder(ref name) if name == "bogus"));
}

#[test]
fn missing_import_is_data_not_a_fault() {
    let s = session();
    let report = s.import("nonexistent.pkg", None).unwrap();
    assert!(!report.ok);
    assert!(!report.messages.is_empty());
}

#[parameterized(
    one = { 1 },
    just_below = { 8191 },
    negative = { -1 },
)]
fn alloc_limit_rejects(limit: i32) {
    let s = session();
    assert!(matches!(s.alloc_limit(Some(limit)), Err(Error::InvalidArgument(_))));
}

#[parameterized(
    unlimited = { 0 },
    minimum = { 8192 },
)]
fn alloc_limit_accepts(limit: i32) {
    let s = session();
    let (current, _) = s.alloc_limit(Some(limit)).unwrap();
    assert_eq!(current, limit);
    assert_eq!(s.alloc_limit(None).unwrap().0, limit);
}

#[test]
fn whole_file_full_match_counts_one() {
    let s = session();
    let p = pattern(&s, "{[a-z\\n]+ $}");
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.txt");
    std::fs::write(&input, "all\nlowercase\n").unwrap();
    let output = tmp.path().join("out.txt");
    let errors = tmp.path().join("err.txt");
    let counts = s
        .match_file(
            &p,
            "matches",
            FileArgs {
                input: Some(&input),
                output: Some(&output),
                errors: Some(&errors),
                whole_file: true,
            },
        )
        .unwrap();
    assert_eq!(
        counts,
        FileCounts {
            read: 1,
            matched: 1,
            unmatched: 0
        }
    );
    similar_asserts::assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "all\nlowercase\n\n"
    );
}

#[test]
fn match_file_io_error_carries_message() {
    let s = session();
    let p = pattern(&s, "[a-z]+");
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("missing.txt");
    let err = s
        .match_file(
            &p,
            "json",
            FileArgs {
                input: Some(&missing),
                ..FileArgs::default()
            },
        )
        .unwrap_err();
    let Error::FileIo(message) = err else {
        panic!("expected FileIo, got {err:?}");
    };
    assert!(message.contains("missing.txt"));
}

#[test]
fn released_pattern_is_invalid_everywhere() {
    let s = session();
    let mut p = pattern(&s, "[a-z]+");
    p.release();
    assert_eq!(p.id(), 0);
    p.release();
    assert!(matches!(s.match_input(&p, b"a", 1, "json"), Err(Error::InvalidPattern)));
    assert!(matches!(s.trace(&p, b"a", 1, "full"), Err(Error::InvalidPattern)));
    assert!(matches!(
        s.match_file(&p, "json", FileArgs::default()),
        Err(Error::InvalidPattern)
    ));
}

#[test]
fn dropping_a_pattern_releases_it() {
    let s = session();
    let before = s.config().unwrap().get("patterns").map(str::to_string);
    {
        let _p = pattern(&s, "\"x\"");
        assert_ne!(s.config().unwrap().get("patterns").map(str::to_string), before);
    }
    assert_eq!(s.config().unwrap().get("patterns").map(str::to_string), before);
}

#[test]
fn patterns_belong_to_their_session() {
    let a = session();
    let b = session();
    let p = pattern(&a, "\"x\"");
    assert!(matches!(b.match_input(&p, b"x", 1, "bool"), Err(Error::InvalidPattern)));
    assert!(a.match_input(&p, b"x", 1, "bool").unwrap().matched());
}

#[test]
fn finalize_invalidates_everything() {
    let s = session();
    let p = pattern(&s, "\"x\"");
    s.finalize();
    assert!(s.is_finalized());
    assert!(matches!(s.match_input(&p, b"x", 1, "bool"), Err(Error::UseAfterFinalize)));
    assert!(matches!(s.compile("\"y\""), Err(Error::UseAfterFinalize)));
    assert!(matches!(s.libpath(), Err(Error::UseAfterFinalize)));
    assert!(matches!(s.load("a = \"a\""), Err(Error::UseAfterFinalize)));
    s.finalize();
    drop(p);
}

#[test]
fn invalid_trace_style() {
    let s = session();
    let p = pattern(&s, "\"x\"");
    let err = s.trace(&p, b"x", 1, "sparkly").unwrap_err();
    assert!(matches!(err, Error::InvalidTraceStyle(ref st) if st == "sparkly"));
}

#[test]
fn compile_failure_returns_messages() {
    let s = session();
    let (p, messages) = s.compile("nope.nothing").unwrap();
    assert!(p.is_none());
    assert!(messages[0].message.contains("undefined package"));
}

#[test]
fn load_reports_package_name() {
    let s = session();
    let report = s.load("package greet\nhello = \"hello\"").unwrap();
    assert!(report.ok);
    assert_eq!(report.package.as_deref(), Some("greet"));
    let p = pattern(&s, "greet.hello");
    let m = s.match_input(&p, b"hello world", 1, "json").unwrap();
    let MatchData::Bytes(json) = m.data else {
        panic!("expected bytes");
    };
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["type"], "greet.hello");
}

#[test]
fn load_file_uses_libpath() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("defs.rpl"), "vowel = [aeiou]").unwrap();
    let s = session();
    s.set_libpath(tmp.path().to_str().unwrap()).unwrap();
    assert_eq!(s.libpath().unwrap(), tmp.path().to_str().unwrap());
    let report = s.load_file(Path::new("defs.rpl")).unwrap();
    assert!(report.ok, "{:?}", report.messages);
    pattern(&s, "vowel");
}

#[test]
fn rc_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let rc = tmp.path().join("rc");
    std::fs::write(&rc, "import = [\"word\"]\n").unwrap();
    let s = session();
    let RcFile::Options(options) = s.read_rc_file(Some(&rc)).unwrap() else {
        panic!("expected options");
    };
    assert_eq!(options.import, vec!["word"]);
    assert_eq!(s.execute_rc_file(Some(&rc)).unwrap(), RcOutcome::Applied);
    pattern(&s, "word.any");
    assert_eq!(
        s.read_rc_file(Some(&tmp.path().join("absent"))).unwrap(),
        RcFile::Missing
    );
}

#[test]
fn left_recursion_abends() {
    let s = session();
    assert!(s.load("loop = {loop \"a\"}").unwrap().ok);
    let p = pattern(&s, "loop");
    let m = s.match_input(&p, b"aaa", 1, "json").unwrap();
    assert_eq!(m.data, MatchData::NoMatch);
    assert!(m.abend);
}

proptest! {
    #[test]
    fn match_and_trace_agree(input in "[a-z0-9 ]{0,24}", start in 0i32..30) {
        let s = session();
        let p = pattern(&s, "{[a-z]+ [0-9]*} / [0-9]+");
        let matched = s.match_input(&p, input.as_bytes(), start, "bool").unwrap().matched();
        let (traced, _) = s.trace(&p, input.as_bytes(), start, "condensed").unwrap();
        prop_assert_eq!(matched, traced);
    }

    #[test]
    fn compile_is_idempotent(input in "[a-z0-9.]{0,16}") {
        let s = session();
        let a = pattern(&s, "findall:{[0-9]+}");
        let b = pattern(&s, "findall:{[0-9]+}");
        prop_assert_ne!(a.id(), b.id());
        let ma = s.match_input(&a, input.as_bytes(), 1, "json").unwrap();
        let mb = s.match_input(&b, input.as_bytes(), 1, "json").unwrap();
        prop_assert_eq!(ma.data, mb.data);
        prop_assert_eq!(ma.leftover, mb.leftover);
    }
}
