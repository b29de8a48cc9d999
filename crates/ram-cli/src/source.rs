//! Program and input tape loading.
//!
//! Program files hold one command per line; a trailing newline does not add
//! an empty line. Tape files hold integers separated by whitespace, commas or
//! both.

use std::fs;
use std::path::Path;

use ram_core::{compile, Program, Value};

use crate::CliError;

/// Reads and compiles a program file.
///
/// # Errors
///
/// Returns [`CliError::Read`] when the file cannot be read and
/// [`CliError::Compile`] for the first bad line.
pub fn load_program(path: &Path) -> Result<Program, CliError> {
    let text = read(path)?;
    let program = compile(text.lines()).map_err(|error| CliError::Compile {
        path: path.to_path_buf(),
        line: error.line,
        kind: error.kind,
    })?;
    log::debug!("loaded {} line(s) from {}", program.len(), path.display());
    Ok(program)
}

/// Reads an input tape file.
///
/// # Errors
///
/// Returns [`CliError::Read`] or [`CliError::InvalidTapeValue`].
pub fn load_tape(path: &Path) -> Result<Vec<Value>, CliError> {
    parse_tape(&read(path)?)
}

/// Parses integers separated by whitespace and/or commas.
///
/// # Errors
///
/// Returns [`CliError::InvalidTapeValue`] for the first entry that is not an
/// integer.
pub fn parse_tape(text: &str) -> Result<Vec<Value>, CliError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse().map_err(|_| CliError::InvalidTapeValue {
                position: index + 1,
                token: token.to_string(),
            })
        })
        .collect()
}

pub(crate) fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
