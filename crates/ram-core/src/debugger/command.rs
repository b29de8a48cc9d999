use std::str::FromStr;

use thiserror::Error;

/// Operator commands accepted at the debugger prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugCommand {
    /// Execute the pending command and pause again (empty line or `step`).
    Step,
    /// Show the command list.
    Help,
    /// End the session.
    Exit,
    /// Stop rendering until the program halts.
    Continue,
    /// Rewind to the first snapshot.
    Reset,
    /// List every snapshot with its index.
    States,
    /// Rewind to the snapshot with this index.
    Rollback(usize),
    /// Run silently until the instruction pointer reaches this line.
    SuspendUntil(usize),
}

/// Operator input the debugger could not act on. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum DebuggerCommandError {
    /// Unrecognised command word.
    #[error("unknown command {0:?}; type `help` for the command list")]
    UnknownCommand(String),
    /// Command requires an argument that was not given.
    #[error("`{command}` needs an argument")]
    MissingArgument {
        /// Command word.
        command: &'static str,
    },
    /// Argument was not a non-negative integer, or was followed by more text.
    #[error("`{command}` cannot use argument {argument:?}")]
    InvalidArgument {
        /// Command word.
        command: &'static str,
        /// Offending text.
        argument: String,
    },
    /// Rollback target outside the recorded history.
    #[error("no snapshot {index}; history holds {len} snapshot(s)")]
    SnapshotOutOfRange {
        /// Requested snapshot index.
        index: usize,
        /// Current history length.
        len: usize,
    },
    /// Breakpoint line outside the program.
    #[error("line {line} is outside the program (1..={program_len}, or 0 to never suspend)")]
    LineOutOfRange {
        /// Requested line.
        line: usize,
        /// Number of program lines.
        program_len: usize,
    },
}

impl FromStr for DebugCommand {
    type Err = DebuggerCommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lowered = input.trim().to_ascii_lowercase();
        let mut words = lowered.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Self::Step);
        };

        let command = match word {
            "step" => Self::Step,
            "help" => Self::Help,
            "exit" => Self::Exit,
            "continue" => Self::Continue,
            "reset" => Self::Reset,
            "states" => Self::States,
            "rollback" => Self::Rollback(index_argument("rollback", words.next())?),
            "suspenduntil" => Self::SuspendUntil(index_argument("suspenduntil", words.next())?),
            other => return Err(DebuggerCommandError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(DebuggerCommandError::InvalidArgument {
                command: command.name(),
                argument: extra.to_string(),
            });
        }
        Ok(command)
    }
}

impl DebugCommand {
    /// Command word as typed by the operator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Step => "step",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Continue => "continue",
            Self::Reset => "reset",
            Self::States => "states",
            Self::Rollback(_) => "rollback",
            Self::SuspendUntil(_) => "suspenduntil",
        }
    }
}

fn index_argument(
    command: &'static str,
    argument: Option<&str>,
) -> Result<usize, DebuggerCommandError> {
    let argument = argument.ok_or(DebuggerCommandError::MissingArgument { command })?;
    argument
        .parse()
        .map_err(|_| DebuggerCommandError::InvalidArgument {
            command,
            argument: argument.to_string(),
        })
}
