// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Quarry CLI entry point.

use clap::{CommandFactory, Parser};
use termcolor::{StandardStream, WriteColor};
use tracing_subscriber::{EnvFilter, fmt};

use quarry::api::{Pattern, Session};
use quarry::cli::{Cli, Command};
use quarry::color::{resolve_color, scheme};
use quarry::diagnostic::Diagnostic;
use quarry::error::{Error, ExitCode};
use quarry::rcfile::RcOutcome;

mod cmd_config;
mod cmd_match;
mod cmd_trace;

fn init_logging() {
    let filter = EnvFilter::try_from_env("QUARRY_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("quarry: {}", e);
            match e.downcast_ref::<Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Match(args)) => cmd_match::run(&cli, args, false),
        Some(Command::Grep(args)) => cmd_match::run(&cli, args, true),
        Some(Command::Trace(args)) => cmd_trace::run(&cli, args),
        Some(Command::Config(args)) => cmd_config::run(&cli, args),
    }
}

/// Create a session and apply the rc file, libpath, loads, and imports
/// named on the command line.
pub(crate) fn open_session(cli: &Cli) -> anyhow::Result<Session> {
    let session = Session::new(None)?;

    if !cli.norc {
        match session.execute_rc_file(cli.rcfile.as_deref())? {
            RcOutcome::Missing if cli.rcfile.is_some() => {
                return Err(Error::Config {
                    message: "rc file not found".to_string(),
                    path: cli.rcfile.clone(),
                }
                .into());
            }
            RcOutcome::Failed(messages) => {
                print_diagnostics(&messages);
                tracing::warn!(errors = messages.len(), "rc file had errors");
            }
            RcOutcome::Missing | RcOutcome::Applied => {}
        }
    }
    if let Some(libpath) = &cli.libpath {
        session.set_libpath(libpath)?;
    }
    for (path, alias) in cli.imports() {
        let report = session.import(path, alias)?;
        if !report.ok {
            print_diagnostics(&report.messages);
            return Err(Error::Config {
                message: format!("cannot import {path}"),
                path: None,
            }
            .into());
        }
    }
    for file in &cli.load {
        let report = session.load_file(file)?;
        if !report.ok {
            print_diagnostics(&report.messages);
            return Err(Error::Config {
                message: format!("cannot load {}", file.display()),
                path: Some(file.clone()),
            }
            .into());
        }
    }
    Ok(session)
}

/// Compile `expression`, printing diagnostics on failure.
pub(crate) fn compile(session: &Session, expression: &str) -> anyhow::Result<Pattern> {
    let (pattern, messages) = session.compile(expression)?;
    match pattern {
        Some(pattern) => Ok(pattern),
        None => {
            print_diagnostics(&messages);
            Err(Error::Config {
                message: format!("cannot compile '{expression}'"),
                path: None,
            }
            .into())
        }
    }
}

/// Write diagnostics to stderr.
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let mut stderr = StandardStream::stderr(resolve_color());
    for d in diagnostics {
        let _ = write_diagnostic(&mut stderr, d);
    }
}

fn write_diagnostic(w: &mut impl WriteColor, d: &Diagnostic) -> std::io::Result<()> {
    w.set_color(&scheme::error())?;
    write!(w, "error")?;
    w.reset()?;
    write!(w, ": ")?;
    let mut location = d.source.clone().unwrap_or_default();
    if d.line > 0 {
        if !location.is_empty() {
            location.push(':');
        }
        location.push_str(&format!("{}:{}", d.line, d.column));
    }
    if !location.is_empty() {
        w.set_color(&scheme::location())?;
        write!(w, "{location}")?;
        w.reset()?;
        write!(w, ": ")?;
    }
    writeln!(w, "{}", d.message)
}
