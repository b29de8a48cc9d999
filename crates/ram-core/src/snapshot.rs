use std::fmt;

use crate::registers::{RegisterStore, Value};
use crate::Command;

/// Full engine state captured just before a command executes.
///
/// Every snapshot owns its own copy of the register map and output tape, so
/// later execution never changes a recorded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Snapshot {
    /// Line about to execute.
    pub instruction_pointer: usize,
    /// Index of the next unread input value.
    pub input_pointer: usize,
    /// Output tape at capture time.
    pub output: Vec<Value>,
    /// Register map at capture time.
    pub registers: RegisterStore,
    /// Command fetched at `instruction_pointer`.
    pub command: Command,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | ip={} in={} out={:?} regs={}",
            self.command, self.instruction_pointer, self.input_pointer, self.output, self.registers
        )
    }
}
