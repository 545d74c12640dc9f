// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn parse_bare_invocation() {
    let cli = Cli::parse_from(["quarry"]);
    assert!(cli.command.is_none());
    assert!(cli.rcfile.is_none());
    assert!(!cli.norc);
}

#[test]
fn parse_match_with_files_and_encoder() {
    let cli = Cli::parse_from(["quarry", "match", "-o", "json", "[0-9]+", "a.txt", "b.txt"]);
    let Some(Command::Match(args)) = cli.command else {
        panic!("expected match command");
    };
    assert_eq!(args.expression, "[0-9]+");
    assert_eq!(args.files.len(), 2);
    assert_eq!(args.encoder.as_deref(), Some("json"));
    assert!(!args.wholefile);
}

#[test]
fn encoder_flag_is_short_o_or_long_output() {
    let cli = Cli::parse_from(["quarry", "grep", "--output", "line", "x"]);
    let Some(Command::Grep(args)) = cli.command else {
        panic!("expected grep command");
    };
    assert_eq!(args.encoder.as_deref(), Some("line"));

    assert!(Cli::try_parse_from(["quarry", "match", "-e", "json", "x"]).is_err());
}

#[test]
fn parse_grep_wholefile() {
    let cli = Cli::parse_from(["quarry", "grep", "--wholefile", "net.ipv4"]);
    let Some(Command::Grep(args)) = cli.command else {
        panic!("expected grep command");
    };
    assert!(args.wholefile);
    assert!(args.files.is_empty());
    assert!(args.encoder.is_none());
}

#[test]
fn parse_trace_defaults() {
    let cli = Cli::parse_from(["quarry", "trace", "\"a\"", "abc"]);
    let Some(Command::Trace(args)) = cli.command else {
        panic!("expected trace command");
    };
    assert_eq!(args.style, "condensed");
    assert_eq!(args.start, 1);
    assert_eq!(args.input, "abc");
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "quarry", "config", "--norc", "--load", "x.rpl", "--import", "net", "--import",
        "date=d", "--libpath", "/a:/b",
    ]);
    assert!(cli.norc);
    assert_eq!(cli.load, vec![PathBuf::from("x.rpl")]);
    assert_eq!(cli.libpath.as_deref(), Some("/a:/b"));
    let imports: Vec<_> = cli.imports().collect();
    assert_eq!(imports, vec![("net", None), ("date", Some("d"))]);
}

#[test]
fn norc_conflicts_with_rcfile() {
    let result = Cli::try_parse_from(["quarry", "--norc", "--rcfile", "x", "config"]);
    assert!(result.is_err());
}
