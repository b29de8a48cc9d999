//! Command-line host for the RAM interpreter: file loading, configuration and
//! a terminal debugger console.

use simple_logger as _;
#[cfg(test)]
use tempfile as _;

/// Terminal implementation of the debugger console.
pub mod console;
/// Host-level error type.
pub mod error;
/// Session driver and program listing.
pub mod runner;
/// JSON configuration loading and flag overrides.
pub mod settings;
/// Program and input tape loading.
pub mod source;

pub use console::TerminalConsole;
pub use error::CliError;
pub use runner::{listing, run_session, SessionReport};
pub use settings::{load_config, resolve_config, ConfigOverrides};
pub use source::{load_program, load_tape, parse_tape};
