// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `quarry match` and `quarry grep` command implementation.

use anyhow::Result;

use quarry::api::FileArgs;
use quarry::cli::{Cli, MatchArgs};
use quarry::color::{default_encoder, resolve_color};
use quarry::error::ExitCode;

/// Run `match`, or `grep` when `find_all` is set: the expression is then
/// searched for anywhere in each record.
pub fn run(cli: &Cli, args: &MatchArgs, find_all: bool) -> Result<ExitCode> {
    let session = crate::open_session(cli)?;
    let expression = if find_all {
        format!("findall:({})", args.expression)
    } else {
        args.expression.clone()
    };
    let pattern = crate::compile(&session, &expression)?;
    let encoder = args
        .encoder
        .as_deref()
        .unwrap_or_else(|| default_encoder(resolve_color()));

    let inputs: Vec<Option<&std::path::Path>> = if args.files.is_empty() {
        vec![None]
    } else {
        args.files.iter().map(|f| Some(f.as_path())).collect()
    };

    let null = null_device();
    let mut matched = 0;
    for input in inputs {
        let counts = session.match_file(
            &pattern,
            encoder,
            FileArgs {
                input,
                output: None,
                errors: Some(null),
                whole_file: args.wholefile,
            },
        )?;
        tracing::debug!(?input, read = counts.read, matched = counts.matched, "file matched");
        matched += counts.matched;
    }

    Ok(if matched > 0 {
        ExitCode::Success
    } else {
        ExitCode::NoMatch
    })
}

fn null_device() -> &'static std::path::Path {
    std::path::Path::new(if cfg!(windows) { "NUL" } else { "/dev/null" })
}
