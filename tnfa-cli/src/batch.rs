//! Line-oriented batch compilation
//!
//! Every non-empty input line is one pattern. Patterns are compiled
//! independently; a malformed one, or a line that is not valid UTF-8, is
//! recorded and the batch moves on.

use log::{debug, info};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tnfa_core::{CompileError, Compiler, serialize};

/// Fatal I/O failures
#[derive(Error, Debug)]
pub enum CliError {
    /// The input file could not be opened or read
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The result file could not be written
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why one input line produced no automaton
#[derive(Error, Debug)]
pub enum LineError {
    /// The line is not valid UTF-8
    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Serialization of one successfully compiled pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub pattern: String,
    pub text: String,
}

/// Outcome of compiling every line of an input
#[derive(Debug, Default)]
pub struct BatchReport {
    pub compiled: Vec<Compiled>,
    pub failures: Vec<LineError>,
}

/// What ends up in the result file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    /// Every serialization, in input order
    All,
    /// Only the last serialization, like the old truncate-per-line writer
    LastOnly,
}

impl BatchReport {
    /// Contents of the result file for `mode`
    pub fn render(&self, mode: ResultMode) -> String {
        let selected: Vec<&str> = match mode {
            ResultMode::All => self.compiled.iter().map(|c| c.text.as_str()).collect(),
            ResultMode::LastOnly => self
                .compiled
                .last()
                .map(|c| c.text.as_str())
                .into_iter()
                .collect(),
        };

        let mut out = selected.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Compile every pattern read from `reader`
///
/// `on_result` sees each outcome as soon as it is produced, so callers can
/// echo progress without waiting for the whole batch. A line that is not
/// valid UTF-8 is passed to it lossily decoded. Only a failing read aborts
/// the batch.
pub fn compile_lines<R, F>(
    mut reader: R,
    compiler: &Compiler<'_>,
    mut on_result: F,
) -> io::Result<BatchReport>
where
    R: BufRead,
    F: FnMut(&str, Result<&Compiled, &LineError>),
{
    let mut report = BatchReport::default();
    let mut buf = Vec::new();
    let mut number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        if bytes.is_empty() {
            debug!("skipping empty line {}", number);
            continue;
        }

        let pattern = match std::str::from_utf8(bytes) {
            Ok(pattern) => pattern,
            Err(_) => {
                let err = LineError::InvalidUtf8 { line: number };
                on_result(&String::from_utf8_lossy(bytes), Err(&err));
                report.failures.push(err);
                continue;
            }
        };

        match compiler.compile(pattern) {
            Ok(nfa) => {
                let compiled = Compiled {
                    pattern: pattern.to_string(),
                    text: serialize(&nfa),
                };
                on_result(pattern, Ok(&compiled));
                report.compiled.push(compiled);
            }
            Err(err) => {
                let err = LineError::from(err);
                on_result(pattern, Err(&err));
                report.failures.push(err);
            }
        }
    }

    info!(
        "compiled {} pattern(s), {} failed",
        report.compiled.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Compile every pattern in the file at `path`
pub fn compile_file<F>(
    path: &Path,
    compiler: &Compiler<'_>,
    on_result: F,
) -> Result<BatchReport, CliError>
where
    F: FnMut(&str, Result<&Compiled, &LineError>),
{
    let read_err = |source: io::Error| CliError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(read_err)?;
    compile_lines(io::BufReader::new(file), compiler, on_result).map_err(read_err)
}

/// Write the result file in one go
pub fn write_results(path: &Path, report: &BatchReport, mode: ResultMode) -> Result<(), CliError> {
    debug!("writing results to {}", path.display());
    fs::write(path, report.render(mode)).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
