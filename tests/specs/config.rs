//! Specs for `quarry config` and rc file handling.

use crate::prelude::*;

#[test]
fn config_lists_entries() {
    quarry_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicates::str::contains("encoders")
                .and(predicates::str::contains("json,bool,line"))
                .and(predicates::str::contains("trace_styles")),
        );
}

#[test]
fn config_json_is_parseable() {
    let output = quarry_cmd().args(["config", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert!(entries.iter().any(|e| e["name"] == "version"));
}

#[test]
fn libpath_environment_is_reported() {
    quarry_cmd()
        .env("QUARRY_LIBPATH", "/from/env")
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("/from/env"));
}

#[test]
fn rcfile_settings_are_applied() {
    let scratch = Scratch::new();
    let rc = scratch.file("rc", "alloc_limit = 16384\nimport = [\"date as d\"]\n");
    quarry_cmd()
        .arg("--rcfile")
        .arg(&rc)
        .args(["match", "-o", "matches", "d.ymd"])
        .write_stdin("2026-10-19\n")
        .assert()
        .success()
        .stdout("2026-10-19\n");
}

#[test]
fn default_rcfile_is_read_from_home() {
    let scratch = Scratch::new();
    scratch.file(".quarryrc", "libpath = \"/from/rc\"\n");
    quarry_cmd()
        .env("HOME", scratch.path())
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("/from/rc"));
}

#[test]
fn norc_skips_the_rcfile() {
    let scratch = Scratch::new();
    scratch.file(".quarryrc", "libpath = \"/from/rc\"\n");
    quarry_cmd()
        .env("HOME", scratch.path())
        .args(["--norc", "config", "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("/from/rc").not());
}

#[test]
fn rcfile_errors_are_warnings() {
    let scratch = Scratch::new();
    let rc = scratch.file("rc", "alloc_limit = 5\n");
    quarry_cmd()
        .arg("--rcfile")
        .arg(&rc)
        .arg("config")
        .assert()
        .success()
        .stderr(predicates::str::contains("allocation limit"));
}

#[test]
fn explicit_missing_rcfile_is_an_error() {
    quarry_cmd()
        .args(["--rcfile", "/nonexistent/rc", "config"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("rc file not found"));
}
