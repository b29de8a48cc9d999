//! Core interpreter for the Random-Access-Machine (RAM) abstract machine.

/// Sparse register file with the accumulator at address 0.
pub mod registers;
pub use registers::{Address, RegisterStore, Value, ACCUMULATOR};

/// Instruction set table and mnemonic lookup.
pub mod instruction;
pub use instruction::Instruction;

/// Operand parsing and immediate/direct/indirect address resolution.
pub mod operand;
pub use operand::{
    AddressingMode, NegativeAddress, Operand, Resolved, INDIRECTION_MARKER, MAX_INDIRECTION_DEPTH,
};

/// All-or-nothing compilation of program text into numbered commands.
pub mod compiler;
pub use compiler::{compile, Command, CompileError, CompileErrorKind, Program};

/// Run-time fault taxonomy.
pub mod fault;
pub use fault::Fault;

/// Engine state capture used for history and rollback.
pub mod snapshot;
pub use snapshot::Snapshot;

/// Fetch-execute engine.
pub mod machine;
pub use machine::{Machine, RunOutcome, StepOutcome, HALTED};

/// Session options and their validation.
pub mod config;
pub use config::{
    ConfigError, SimulatorConfig, DEFAULT_LINES_LOGGED, DEFAULT_MAX_INSTRUCTIONS,
    DEFAULT_TIMEOUT_SECONDS,
};

/// Snapshotting, rollback and breakpoint debugger.
pub mod debugger;
pub use debugger::{
    render_frame, render_states, CommandOutcome, DebugCommand, DebugConsole, DebugOutcome,
    Debugger, DebuggerCommandError, DebuggerState, SessionEnd, SilentConsole,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
