//! Host-level failures, each rendered as one `error: ...` line by the binary.

use std::io;
use std::path::PathBuf;

use ram_core::{CompileErrorKind, ConfigError, Fault};
use thiserror::Error;

/// Anything that stops the CLI before or during a session.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The program file failed to compile.
    #[error("{}:{line}: {kind}", path.display())]
    Compile {
        /// Program file.
        path: PathBuf,
        /// 1-based line of the first bad command.
        line: usize,
        /// What was wrong with it.
        kind: CompileErrorKind,
    },
    /// An input tape entry is not an integer.
    #[error("input value {position} ({token:?}) is not an integer")]
    InvalidTapeValue {
        /// 1-based position on the tape.
        position: usize,
        /// Offending text.
        token: String,
    },
    /// The configuration file is not valid JSON for the options.
    #[error("invalid configuration in {}: {source}", path.display())]
    ConfigSyntax {
        /// Configuration file.
        path: PathBuf,
        /// Parser error with line and column.
        source: serde_json::Error,
    },
    /// A configuration value is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The program faulted at run time.
    #[error(transparent)]
    Fault(#[from] Fault),
}
