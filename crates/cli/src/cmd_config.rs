// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `quarry config` command implementation.

use anyhow::Result;
use termcolor::{StandardStream, WriteColor};

use quarry::cli::{Cli, ConfigArgs};
use quarry::color::{resolve_color, scheme};
use quarry::engine::Config;
use quarry::error::ExitCode;

pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<ExitCode> {
    let session = crate::open_session(cli)?;
    let config = session.config()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        let mut stdout = StandardStream::stdout(resolve_color());
        write_config(&mut stdout, &config)?;
    }
    Ok(ExitCode::Success)
}

fn write_config(w: &mut impl WriteColor, config: &Config) -> std::io::Result<()> {
    let width = config.0.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &config.0 {
        w.set_color(&scheme::name())?;
        write!(w, "{:width$}", entry.name)?;
        w.reset()?;
        write!(w, "  {}  ", entry.value)?;
        w.set_color(&scheme::description())?;
        write!(w, "# {}", entry.description)?;
        w.reset()?;
        writeln!(w)?;
    }
    w.flush()
}
