//! Program compilation: raw text lines to numbered commands.
//!
//! Compilation is all-or-nothing. The first malformed line aborts the whole
//! program with a [`CompileError`] carrying its 1-based line number.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Instruction, Operand};

/// Classification of per-line compile failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum CompileErrorKind {
    /// Unknown mnemonic.
    #[error("invalid instruction: {0:?}")]
    InvalidInstruction(String),
    /// Operand token is not `markers* digits+`.
    #[error("invalid operand: {0:?}")]
    InvalidOperand(String),
    /// A line carried more than a mnemonic and one operand.
    #[error("unexpected token: {0:?}")]
    UnexpectedToken(String),
}

/// Compile failure bound to the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("line {line}: {kind}")]
pub struct CompileError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong on that line.
    #[source]
    pub kind: CompileErrorKind,
}

/// One compiled program line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Command {
    /// Instruction to execute.
    pub instruction: Instruction,
    /// Operand, `0` when the line had none.
    pub operand: Operand,
    /// 1-based position in the program.
    pub line: usize,
}

impl Command {
    /// Parses a single line of program text.
    ///
    /// # Errors
    ///
    /// Returns the failure kind without a line number; [`compile`] attaches
    /// it.
    pub fn parse(text: &str, line: usize) -> Result<Self, CompileErrorKind> {
        let mut tokens = text.split_whitespace();
        let mnemonic = tokens.next().unwrap_or_default();
        let instruction = Instruction::from_str(mnemonic)?;
        let operand = tokens
            .next()
            .map_or_else(|| Ok(Operand::default()), Operand::from_str)?;

        if let Some(extra) = tokens.next() {
            return Err(CompileErrorKind::UnexpectedToken(extra.to_string()));
        }

        Ok(Self {
            instruction,
            operand,
            line,
        })
    }

    /// Program text for this command, without the line number.
    #[must_use]
    pub fn source_text(&self) -> String {
        format!("{} {}", self.instruction, self.operand)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.line, self.instruction, self.operand)
    }
}

/// A compiled program: commands numbered densely from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Program {
    commands: Vec<Command>,
}

impl Program {
    /// Command at a 1-based line, if it exists.
    #[must_use]
    pub fn get(&self, line: usize) -> Option<&Command> {
        line.checked_sub(1).and_then(|index| self.commands.get(index))
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the program has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether `line` names a command of this program.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        (1..=self.len()).contains(&line)
    }

    /// Commands in line order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands.iter()
    }
}

impl FromStr for Program {
    type Err = CompileError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        compile(source.lines())
    }
}

/// Compiles raw program lines into a [`Program`].
///
/// # Errors
///
/// Returns the first [`CompileError`] encountered; no partial program is
/// produced.
pub fn compile<I, S>(lines: I) -> Result<Program, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let commands = lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let line = index + 1;
            Command::parse(text.as_ref(), line).map_err(|kind| CompileError { line, kind })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("compiled {} command(s)", commands.len());
    Ok(Program { commands })
}

#[cfg(test)]
mod tests {
    use super::{compile, Command, CompileError, CompileErrorKind, Program};
    use crate::{Instruction, Operand};

    #[test]
    fn compiles_lines_with_dense_numbering() {
        let program = compile(["READ 1", "  load *1 ", "HALT"]).expect("valid program");

        assert_eq!(program.len(), 3);
        let lines: Vec<_> = program.iter().map(|command| command.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(
            program.get(2),
            Some(&Command {
                instruction: Instruction::Load,
                operand: Operand::new(1, 1),
                line: 2,
            })
        );
        assert_eq!(program.get(0), None);
        assert_eq!(program.get(4), None);
    }

    #[test]
    fn missing_operand_defaults_to_literal_zero() {
        let program = compile(["HALT"]).expect("valid program");
        let halt = program.get(1).expect("line 1");
        assert_eq!(halt.operand, Operand::immediate(0));
        assert_eq!(halt.source_text(), "HALT 0");
    }

    #[test]
    fn unknown_mnemonic_reports_line() {
        let err = compile(["READ 1", "JUMP 3"]).expect_err("JUMP is not valid");
        assert_eq!(
            err,
            CompileError {
                line: 2,
                kind: CompileErrorKind::InvalidInstruction("JUMP".to_string()),
            }
        );
        assert_eq!(err.to_string(), "line 2: invalid instruction: \"JUMP\"");
    }

    #[test]
    fn malformed_operand_reports_line_and_token() {
        let err = compile(["LOAD 1", "ADD", "SUB *x"]).expect_err("*x is not valid");
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, CompileErrorKind::InvalidOperand("*x".to_string()));
    }

    #[test]
    fn blank_line_is_an_invalid_instruction() {
        let err = compile(["LOAD 1", "", "HALT"]).expect_err("blank line");
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, CompileErrorKind::InvalidInstruction(String::new()));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = compile(["ADD 1 2"]).expect_err("two operands");
        assert_eq!(err.kind, CompileErrorKind::UnexpectedToken("2".to_string()));
    }

    #[test]
    fn program_parses_from_text_without_trailing_empty_line() {
        let program: Program = "READ 1\nWRITE 1\nHALT\n".parse().expect("valid program");
        assert_eq!(program.len(), 3);
        assert!(program.contains_line(3));
        assert!(!program.contains_line(0));
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let program = compile(["mult **3", "jz 7", "write 2"]).expect("valid program");
        for command in program.iter() {
            let reparsed =
                Command::parse(&command.source_text(), command.line).expect("canonical text");
            assert_eq!(&reparsed, command);
        }
        assert_eq!(program.get(1).map(ToString::to_string).as_deref(), Some("1: MUL **3"));
    }
}
