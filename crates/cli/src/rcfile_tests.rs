// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use yare::parameterized;

use super::*;

fn write_rc(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("quarryrc");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn parse_reads_every_setting() {
    let options = parse(
        r#"
version = 1
libpath = ["/a", "/b"]
alloc_limit = 8192
load = ["x.rpl"]
import = ["net", "date as d"]

[colors]
"net.ipv4" = "magenta"
"#,
        "rc",
    )
    .unwrap();
    assert_eq!(options.version, Some(1));
    assert_eq!(options.libpath.unwrap().joined(), "/a:/b");
    assert_eq!(options.alloc_limit, Some(8192));
    assert_eq!(options.load, vec!["x.rpl"]);
    assert_eq!(options.import, vec!["net", "date as d"]);
    assert_eq!(options.colors["net.ipv4"], "magenta");
}

#[test]
fn parse_accepts_joined_libpath() {
    let options = parse(r#"libpath = "/a:/b""#, "rc").unwrap();
    assert_eq!(options.libpath, Some(LibpathSetting::Joined("/a:/b".into())));
}

#[test]
fn parse_ignores_unknown_keys() {
    let options = parse("mystery = true\nalloc_limit = 0\n", "rc").unwrap();
    assert_eq!(options.alloc_limit, Some(0));
    assert_eq!(options, RcOptions { alloc_limit: Some(0), ..RcOptions::default() });
}

#[test]
fn parse_ignores_unknown_float_and_table_keys() {
    let options = parse("ratio = 0.5\n[extra]\nx = 1.25\n", "rc").unwrap();
    assert_eq!(options, RcOptions::default());
    assert_eq!(
        RcFile::Options(options.clone()),
        RcFile::Options(RcOptions::default())
    );
}

#[test]
fn parse_rejects_unsupported_version() {
    let errs = parse("version = 2\n", "rc").unwrap_err();
    assert!(errs[0].message.contains("unsupported rc file version 2"));
    assert_eq!(errs[0].source.as_deref(), Some("rc"));
}

#[test]
fn parse_errors_carry_positions() {
    let errs = parse("version = 1\nlibpath = [\n", "rc").unwrap_err();
    assert_eq!(errs.len(), 1);
    assert!(errs[0].line >= 2, "{:?}", errs[0]);
}

#[parameterized(
    plain = { "net", ("net", None) },
    aliased = { "date as d", ("date", Some("d")) },
    padded = { "  num  ", ("num", None) },
    malformed = { "a as", ("a as", None) },
)]
fn split_import_entries(entry: &str, expected: (&str, Option<&str>)) {
    assert_eq!(split_import(entry), expected);
}

#[test]
fn options_serialize_without_empty_fields() {
    let options = parse("alloc_limit = 0\nextra = 1\n", "rc").unwrap();
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(json, r#"{"alloc_limit":0}"#);
}

#[test]
fn read_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = Engine::new(None).unwrap();
    assert_eq!(engine.read_rc_file(Some(&tmp.path().join("nope"))), RcFile::Missing);
}

#[test]
fn read_invalid_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_rc(tmp.path(), "alloc_limit = \"lots\"\n");
    let engine = Engine::new(None).unwrap();
    assert!(matches!(engine.read_rc_file(Some(&path)), RcFile::Invalid(_)));
}

#[test]
fn execute_applies_settings() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("mine.rpl"), "greeting = \"hi\"\n").unwrap();
    let path = write_rc(
        tmp.path(),
        "libpath = \"/x\"\nalloc_limit = 8192\nload = [\"mine.rpl\"]\nimport = [\"num as n\"]\n",
    );
    let mut engine = Engine::new(None).unwrap();
    assert_eq!(engine.execute_rc_file(Some(&path)), RcOutcome::Applied);
    assert_eq!(engine.libpath(), "/x");
    assert_eq!(engine.alloc_limit().0, 8192);
    assert!(engine.compile("greeting n.int").id.is_some());
}

#[test]
fn execute_reports_failures_but_keeps_good_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_rc(
        tmp.path(),
        "alloc_limit = 10\nimport = [\"num\", \"no/such/pkg\"]\n[colors]\nnum = \"plaid\"\n",
    );
    let mut engine = Engine::new(None).unwrap();
    let RcOutcome::Failed(messages) = engine.execute_rc_file(Some(&path)) else {
        panic!("expected failure");
    };
    assert_eq!(messages.len(), 3, "{messages:?}");
    assert!(messages[0].message.contains("allocation limit"));
    assert!(messages[1].message.contains("unknown color 'plaid'"));
    assert!(messages[2].message.contains("cannot find package 'no/such/pkg'"));
    assert!(engine.compile("num.int").id.is_some());
}

#[test]
fn execute_missing_and_invalid() {
    let tmp = tempfile::tempdir().unwrap();
    let mut engine = Engine::new(None).unwrap();
    assert_eq!(engine.execute_rc_file(Some(&tmp.path().join("nope"))), RcOutcome::Missing);
    let path = write_rc(tmp.path(), "version = 7\n");
    assert!(matches!(engine.execute_rc_file(Some(&path)), RcOutcome::Failed(_)));
}
