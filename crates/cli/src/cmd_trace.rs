// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `quarry trace` command implementation.

use std::io::Write;

use anyhow::Result;

use quarry::cli::{Cli, TraceArgs};
use quarry::error::ExitCode;

pub fn run(cli: &Cli, args: &TraceArgs) -> Result<ExitCode> {
    let session = crate::open_session(cli)?;
    let pattern = crate::compile(&session, &args.expression)?;
    let (matched, trace) = session.trace(&pattern, args.input.as_bytes(), args.start, &args.style)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&trace)?;
    stdout.flush()?;

    Ok(if matched {
        ExitCode::Success
    } else {
        ExitCode::NoMatch
    })
}
