//! Instruction set table and mnemonic resolution.

use std::fmt;
use std::str::FromStr;

use crate::CompileErrorKind;

/// The closed RAM instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// Reads the value under the input head into register `n`.
    Read,
    /// Appends register `n` to the output tape.
    Write,
    /// Loads the operand value into the accumulator.
    Load,
    /// Stores the accumulator into register `n`.
    Store,
    /// Adds the operand value to the accumulator.
    Add,
    /// Subtracts the operand value from the accumulator.
    Sub,
    /// Multiplies the accumulator by the operand value.
    Mul,
    /// Divides the accumulator by the operand value, truncating toward zero.
    Div,
    /// Jumps to line `n`.
    Goto,
    /// Jumps to the operand address when the accumulator is zero.
    Jz,
    /// Jumps to the operand address when the accumulator is positive.
    Jgtz,
    /// Stops execution by moving the instruction pointer to 0.
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MnemonicEntry {
    name: &'static str,
    instruction: Instruction,
}

const MNEMONIC_ENTRIES: &[MnemonicEntry] = &[
    MnemonicEntry {
        name: "READ",
        instruction: Instruction::Read,
    },
    MnemonicEntry {
        name: "WRITE",
        instruction: Instruction::Write,
    },
    MnemonicEntry {
        name: "LOAD",
        instruction: Instruction::Load,
    },
    MnemonicEntry {
        name: "STORE",
        instruction: Instruction::Store,
    },
    MnemonicEntry {
        name: "ADD",
        instruction: Instruction::Add,
    },
    MnemonicEntry {
        name: "SUB",
        instruction: Instruction::Sub,
    },
    MnemonicEntry {
        name: "MUL",
        instruction: Instruction::Mul,
    },
    MnemonicEntry {
        name: "DIV",
        instruction: Instruction::Div,
    },
    MnemonicEntry {
        name: "GOTO",
        instruction: Instruction::Goto,
    },
    MnemonicEntry {
        name: "JZ",
        instruction: Instruction::Jz,
    },
    MnemonicEntry {
        name: "JGTZ",
        instruction: Instruction::Jgtz,
    },
    MnemonicEntry {
        name: "HALT",
        instruction: Instruction::Halt,
    },
];

/// Legacy spellings accepted on input but never produced on output.
const MNEMONIC_ALIASES: &[MnemonicEntry] = &[MnemonicEntry {
    name: "MULT",
    instruction: Instruction::Mul,
}];

impl Instruction {
    /// Every instruction in table order.
    pub const ALL: [Self; 12] = [
        Self::Read,
        Self::Write,
        Self::Load,
        Self::Store,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Goto,
        Self::Jz,
        Self::Jgtz,
        Self::Halt,
    ];

    /// Resolves a mnemonic case-insensitively.
    #[must_use]
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        MNEMONIC_ENTRIES
            .iter()
            .chain(MNEMONIC_ALIASES)
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.instruction)
    }

    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Goto => "GOTO",
            Self::Jz => "JZ",
            Self::Jgtz => "JGTZ",
            Self::Halt => "HALT",
        }
    }

    /// Whether the operand may carry indirection markers.
    ///
    /// Tape targets, store targets and `GOTO` targets are address-only.
    #[must_use]
    pub const fn allows_indirection(self) -> bool {
        !matches!(self, Self::Read | Self::Write | Self::Store | Self::Goto)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Instruction {
    type Err = CompileErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mnemonic(s).ok_or_else(|| CompileErrorKind::InvalidInstruction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Instruction, MNEMONIC_ENTRIES};
    use crate::CompileErrorKind;

    #[test]
    fn table_covers_every_instruction_once() {
        assert_eq!(MNEMONIC_ENTRIES.len(), Instruction::ALL.len());
        for instruction in Instruction::ALL {
            let hits = MNEMONIC_ENTRIES
                .iter()
                .filter(|entry| entry.instruction == instruction)
                .count();
            assert_eq!(hits, 1, "{instruction} must appear exactly once");
            assert_eq!(
                Instruction::from_mnemonic(instruction.mnemonic()),
                Some(instruction)
            );
        }
    }

    #[test]
    fn lookup_ignores_case_and_accepts_legacy_alias() {
        assert_eq!(Instruction::from_mnemonic("jgtz"), Some(Instruction::Jgtz));
        assert_eq!(Instruction::from_mnemonic("Load"), Some(Instruction::Load));
        assert_eq!(Instruction::from_mnemonic("mult"), Some(Instruction::Mul));
        assert_eq!(Instruction::Mul.to_string(), "MUL");
    }

    #[test]
    fn unknown_mnemonic_carries_offending_text() {
        let err = "JMP".parse::<Instruction>().expect_err("JMP is not a RAM mnemonic");
        assert_eq!(err, CompileErrorKind::InvalidInstruction("JMP".to_string()));
    }

    #[test]
    fn address_only_instructions_reject_indirection() {
        let address_only: Vec<_> = Instruction::ALL
            .into_iter()
            .filter(|instruction| !instruction.allows_indirection())
            .collect();
        assert_eq!(
            address_only,
            vec![
                Instruction::Read,
                Instruction::Write,
                Instruction::Store,
                Instruction::Goto
            ]
        );
    }
}
