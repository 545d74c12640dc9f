// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Match text against PEG patterns
#[derive(Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Pattern search path (`:`-separated)
    #[arg(long, global = true, value_name = "DIRS")]
    pub libpath: Option<String>,

    /// Rc file to execute (default: ~/.quarryrc)
    #[arg(long, global = true, env = "QUARRY_RCFILE", value_name = "FILE")]
    pub rcfile: Option<PathBuf>,

    /// Skip the rc file
    #[arg(long, global = true, conflicts_with = "rcfile")]
    pub norc: bool,

    /// Load pattern source before compiling (repeatable)
    #[arg(long = "load", global = true, value_name = "FILE")]
    pub load: Vec<PathBuf>,

    /// Import a package before compiling (repeatable; `PKG` or `PKG=ALIAS`)
    #[arg(long = "import", global = true, value_name = "PKG")]
    pub import: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match each input line against an expression
    Match(MatchArgs),
    /// Find every occurrence of an expression in each input line
    Grep(MatchArgs),
    /// Show how an expression matches an input
    Trace(TraceArgs),
    /// Show engine configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct MatchArgs {
    /// Pattern expression
    #[arg(value_name = "EXPR")]
    pub expression: String,

    /// Input files (default: standard input)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output encoder (json, bool, line, matches, subs, color, byte)
    #[arg(short = 'o', long = "output", value_name = "ENCODER")]
    pub encoder: Option<String>,

    /// Match each file as a single record
    #[arg(long)]
    pub wholefile: bool,
}

#[derive(clap::Args)]
pub struct TraceArgs {
    /// Pattern expression
    #[arg(value_name = "EXPR")]
    pub expression: String,

    /// Text to match
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Trace style (condensed, full, json)
    #[arg(short, long, default_value = "condensed")]
    pub style: String,

    /// 1-based start position
    #[arg(long, default_value_t = 1)]
    pub start: i32,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// `--import` values split into path and optional alias.
    pub fn imports(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.import.iter().map(|spec| match spec.split_once('=') {
            Some((path, alias)) => (path, Some(alias)),
            None => (spec.as_str(), None),
        })
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
