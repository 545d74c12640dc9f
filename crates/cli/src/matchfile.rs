// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Matching every record of a file.
//!
//! A record is one line (without its `\n` or `\r\n`), or the whole input in
//! whole-file mode. Matches go to the output sink in the chosen encoding,
//! one per line; records that do not match are copied to the error sink.
//! An empty path names the standard stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::engine::{Engine, Fault, Outcome};
use crate::reader::FileReader;
use crate::table::PatternId;

/// Where the records of a `match_file` call come from and go to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileJob<'a> {
    pub infile: &'a str,
    pub outfile: &'a str,
    pub errfile: &'a str,
    pub whole_file: bool,
}

/// Result of a `match_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Records read, matched, and not matched.
    Counts { cin: u64, cout: u64, cerr: u64 },
    InvalidEncoder,
    InvalidPattern,
    /// A file could not be opened, read, or written.
    Io(String),
}

impl Engine {
    pub fn match_file(
        &self,
        id: PatternId,
        encoder: &str,
        job: FileJob<'_>,
    ) -> Result<FileOutcome, Fault> {
        let Some(program) = self.pattern(id) else {
            return Ok(FileOutcome::InvalidPattern);
        };
        let Some(encoder) = self.runtime().encoders().get(encoder) else {
            return Ok(FileOutcome::InvalidEncoder);
        };

        let mut input = match open_input(job.infile) {
            Ok(input) => input,
            Err(err) => return Ok(FileOutcome::Io(describe("read", job.infile, "standard input", &err))),
        };
        let mut out = match open_output(job.outfile, io::stdout) {
            Ok(out) => out,
            Err(err) => return Ok(FileOutcome::Io(describe("write", job.outfile, "standard output", &err))),
        };
        let mut err_sink = match open_output(job.errfile, io::stderr) {
            Ok(sink) => sink,
            Err(err) => return Ok(FileOutcome::Io(describe("write", job.errfile, "standard error", &err))),
        };

        let mut counts = Counts::default();
        let mut record = |bytes: &[u8]| -> Result<Option<FileOutcome>, Fault> {
            counts.cin += 1;
            let report = self.run_one(program, encoder, bytes, 0)?;
            let written = match report.outcome {
                Outcome::Payload(bytes) => {
                    counts.cout += 1;
                    out.write_all(&bytes).and_then(|()| out.write_all(b"\n"))
                }
                Outcome::BooleanMatch => {
                    counts.cout += 1;
                    Ok(())
                }
                _ => {
                    counts.cerr += 1;
                    err_sink
                        .write_all(bytes)
                        .and_then(|()| err_sink.write_all(b"\n"))
                }
            };
            Ok(written
                .err()
                .map(|err| FileOutcome::Io(format!("cannot write output: {err}"))))
        };

        if job.whole_file {
            let reader = FileReader::new();
            let data = if job.infile.is_empty() {
                reader.read_stream(input, Path::new("<stdin>"))
            } else {
                reader.read(Path::new(job.infile))
            };
            match data {
                Ok(data) => {
                    if let Some(failed) = record(&data)? {
                        return Ok(failed);
                    }
                }
                Err(err) => return Ok(FileOutcome::Io(err.to_string())),
            }
        } else {
            let mut line = Vec::new();
            loop {
                line.clear();
                match input.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(err) => return Ok(FileOutcome::Io(describe("read", job.infile, "standard input", &err))),
                }
                if let Some(failed) = record(trim_newline(&line))? {
                    return Ok(failed);
                }
            }
        }
        drop(record);

        if let Err(err) = out.flush().and_then(|()| err_sink.flush()) {
            return Ok(FileOutcome::Io(format!("cannot write output: {err}")));
        }
        tracing::debug!(
            cin = counts.cin,
            cout = counts.cout,
            cerr = counts.cerr,
            "match_file done"
        );
        Ok(FileOutcome::Counts {
            cin: counts.cin,
            cout: counts.cout,
            cerr: counts.cerr,
        })
    }
}

#[derive(Debug, Default)]
struct Counts {
    cin: u64,
    cout: u64,
    cerr: u64,
}

fn open_input(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path.is_empty() {
        return Ok(Box::new(io::stdin().lock()));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

fn open_output<W: Write + 'static>(path: &str, standard: fn() -> W) -> io::Result<Box<dyn Write>> {
    if path.is_empty() {
        return Ok(Box::new(BufWriter::new(standard())));
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

fn describe(verb: &str, path: &str, stream: &str, err: &io::Error) -> String {
    let name = if path.is_empty() { stream } else { path };
    format!("cannot {verb} {name}: {err}")
}

/// Strip one trailing `\n` and then one `\r`.
fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
#[path = "matchfile_tests.rs"]
mod tests;
