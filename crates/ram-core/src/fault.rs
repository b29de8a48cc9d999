use thiserror::Error;

use crate::Instruction;

/// Fatal run-time condition raised while executing a command.
///
/// Faults are precise: the step that raises one commits no register, tape or
/// instruction-pointer change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// The instruction pointer references a line that does not exist.
    #[error("no instruction found at line {line}")]
    LineNotFound {
        /// Requested 1-based line number (0 once halted).
        line: usize,
    },
    /// `READ` executed after every input value was consumed.
    #[error("line {line}: input tape exhausted after {position} value(s)")]
    InputExhausted {
        /// Line of the failing `READ`.
        line: usize,
        /// Input pointer at the time of the read.
        position: usize,
    },
    /// `DIV` with a zero divisor.
    #[error("line {line}: division by zero")]
    DivisionByZero {
        /// Line of the failing `DIV`.
        line: usize,
    },
    /// Indirection used on an address-only instruction.
    #[error("line {line}: {instruction} does not accept indirect operand {operand}")]
    IllegalOperand {
        /// Line of the offending command.
        line: usize,
        /// Instruction that rejected the operand.
        instruction: Instruction,
        /// Canonical operand text.
        operand: String,
    },
    /// An indirection chain landed on a negative register address.
    #[error("line {line}: register address {value} is negative")]
    InvalidAddress {
        /// Line of the offending command.
        line: usize,
        /// Register content that was used as an address.
        value: i64,
    },
    /// More steps were taken than the configured cap allows.
    #[error("instruction limit of {limit} exceeded; the program probably does not terminate")]
    InstructionLimitExceeded {
        /// Configured cap.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::Fault;
    use crate::Instruction;

    #[test]
    fn messages_name_the_offending_line_and_operand() {
        let fault = Fault::IllegalOperand {
            line: 7,
            instruction: Instruction::Goto,
            operand: "*3".to_string(),
        };
        assert_eq!(
            fault.to_string(),
            "line 7: GOTO does not accept indirect operand *3"
        );
    }
}
