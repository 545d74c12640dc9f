//! Specs for `quarry match`, `quarry grep`, and `quarry trace`.

use crate::prelude::*;

#[test]
fn match_prints_matched_text() {
    quarry_cmd()
        .args(["match", "[0-9]+"])
        .write_stdin("42 apples\nno digits\n7\n")
        .assert()
        .success()
        .stdout("42\n7\n");
}

#[test]
fn match_with_no_matches_exits_one() {
    quarry_cmd()
        .args(["match", "[0-9]+"])
        .write_stdin("none here\n")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn match_json_encoder() {
    quarry_cmd()
        .args(["match", "-o", "json", "[a-z]+"])
        .write_stdin("abc\n")
        .assert()
        .success()
        .stdout(r#"{"type":"*","s":1,"e":4,"data":"abc"}"#.to_string() + "\n");
}

#[test]
fn match_line_encoder_reads_files() {
    let scratch = Scratch::new();
    let a = scratch.file("a.txt", "one 1\ntwo\n");
    let b = scratch.file("b.txt", "three 3\n");
    quarry_cmd()
        .args(["match", "-o", "line", "{[a-z]+ \" \" [0-9]}"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout("one 1\nthree 3\n");
}

#[test]
fn grep_finds_anywhere_in_the_line() {
    quarry_cmd()
        .args(["grep", "-o", "line", "--import", "net", "net.ipv4"])
        .write_stdin("host at 10.0.0.1 is up\nnothing\n")
        .assert()
        .success()
        .stdout("host at 10.0.0.1 is up\n");
}

#[test]
fn wholefile_matches_one_record() {
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "a\nb\n");
    quarry_cmd()
        .args(["match", "--wholefile", "-o", "bool", "{[ab\\n]+ $}"])
        .arg(&input)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn unknown_encoder_is_a_usage_error() {
    quarry_cmd()
        .args(["match", "-o", "bogus", "[a-z]"])
        .write_stdin("a\n")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("invalid output encoder: bogus"));
}

#[test]
fn compile_errors_are_reported_with_position() {
    quarry_cmd()
        .args(["match", "[a-"])
        .write_stdin("a\n")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("error: 1:").and(predicates::str::contains("cannot compile")));
}

#[test]
fn missing_input_file_is_reported() {
    quarry_cmd()
        .args(["match", "[a-z]", "/nonexistent/input.txt"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("/nonexistent/input.txt"));
}

#[test]
fn load_and_import_flags() {
    let scratch = Scratch::new();
    let defs = scratch.file("defs.rpl", "package defs\nimport num\nyear = num.uint\n");
    quarry_cmd()
        .args(["match", "-o", "matches", "defs.year"])
        .arg("--load")
        .arg(&defs)
        .write_stdin("2026\n")
        .assert()
        .success()
        .stdout("2026\n");
}

#[test]
fn libpath_flag_finds_packages() {
    let scratch = Scratch::new();
    scratch.file("lib/colors.rpl", "package colors\nprimary = \"red\" / \"green\" / \"blue\"\n");
    quarry_cmd()
        .args(["match", "-o", "matches", "--import", "colors=c", "c.primary"])
        .arg("--libpath")
        .arg(scratch.path().join("lib"))
        .write_stdin("green\n")
        .assert()
        .success()
        .stdout("green\n");
}

#[test]
fn trace_shows_rule_calls() {
    quarry_cmd()
        .args(["trace", "--import", "num", "num.int", "12"])
        .assert()
        .success()
        .stdout(predicates::str::contains("num.int").and(predicates::str::contains("Matched through position")));
}

#[test]
fn trace_without_match_exits_one() {
    quarry_cmd()
        .args(["trace", "[0-9]", "x"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("No match"));
}

#[test]
fn trace_rejects_unknown_style() {
    quarry_cmd()
        .args(["trace", "-s", "sparkly", "[0-9]", "1"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("invalid trace style: sparkly"));
}
