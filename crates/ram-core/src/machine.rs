//! Fetch-execute engine.
//!
//! Each step runs in two phases: the command is evaluated against the current
//! state into an [`Effect`], then the effect is committed. A faulting command
//! returns before the commit phase, so faults leave no partial side effects and
//! the instruction pointer stays on the failing line.

use crate::operand::NegativeAddress;
use crate::registers::{Address, RegisterStore, Value, ACCUMULATOR};
use crate::{Command, Fault, Instruction, Program, Snapshot};

/// Instruction pointer value that marks a halted machine.
pub const HALTED: usize = 0;

/// Result of one successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The command retired and execution continues.
    Retired {
        /// Line that executed.
        line: usize,
        /// Line that executes next.
        next_line: usize,
    },
    /// The command moved the instruction pointer to 0.
    Halted {
        /// Line that executed.
        line: usize,
    },
}

/// Aggregated result of [`Machine::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of steps executed.
    pub steps: usize,
    /// Output tape at halt.
    pub output: Vec<Value>,
}

/// Side effects of one command, computed before anything is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Effect {
    register_write: Option<(Address, Value)>,
    output: Option<Value>,
    consumes_input: bool,
    jump: Option<usize>,
}

/// One RAM simulation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    program: Program,
    registers: RegisterStore,
    input: Vec<Value>,
    input_pointer: usize,
    output: Vec<Value>,
    instruction_pointer: usize,
}

impl Machine {
    /// Creates a machine positioned on line 1 with an empty output tape.
    #[must_use]
    pub fn new(program: Program, input: Vec<Value>) -> Self {
        Self {
            program,
            registers: RegisterStore::new(),
            input,
            input_pointer: 0,
            output: Vec::new(),
            instruction_pointer: 1,
        }
    }

    /// The compiled program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Line that executes next, or [`HALTED`].
    #[must_use]
    pub const fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    /// Index of the next unread input value.
    #[must_use]
    pub const fn input_pointer(&self) -> usize {
        self.input_pointer
    }

    /// Values written so far.
    #[must_use]
    pub fn output(&self) -> &[Value] {
        &self.output
    }

    /// Current register contents.
    #[must_use]
    pub const fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    /// Mutable register access for hosts seeding initial state.
    pub fn registers_mut(&mut self) -> &mut RegisterStore {
        &mut self.registers
    }

    /// `true` exactly when the instruction pointer is 0.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.instruction_pointer == HALTED
    }

    /// Command at the instruction pointer.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::LineNotFound`] when the pointer is outside the program,
    /// which includes the halted state.
    pub fn current_command(&self) -> Result<&Command, Fault> {
        self.program.get(self.instruction_pointer).ok_or(Fault::LineNotFound {
            line: self.instruction_pointer,
        })
    }

    /// Executes the command at the instruction pointer.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the command cannot execute; no state changes
    /// in that case.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        let command = *self.current_command()?;
        let effect = self.evaluate(&command)?;
        log::trace!("execute {command}");
        self.commit(effect);

        let line = command.line;
        if self.is_halted() {
            Ok(StepOutcome::Halted { line })
        } else {
            Ok(StepOutcome::Retired {
                line,
                next_line: self.instruction_pointer,
            })
        }
    }

    /// Steps until the machine halts.
    ///
    /// # Errors
    ///
    /// Propagates the first step [`Fault`], or returns
    /// [`Fault::InstructionLimitExceeded`] once `limit` steps have executed
    /// without halting.
    pub fn run(&mut self, limit: usize) -> Result<RunOutcome, Fault> {
        let mut steps = 0;
        while !self.is_halted() {
            if steps == limit {
                log::warn!("instruction limit of {limit} reached");
                return Err(Fault::InstructionLimitExceeded { limit });
            }
            self.step()?;
            steps += 1;
        }
        Ok(RunOutcome {
            steps,
            output: self.output.clone(),
        })
    }

    /// Captures the state in front of the next command.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::LineNotFound`] when there is no next command.
    pub fn snapshot(&self) -> Result<Snapshot, Fault> {
        let command = *self.current_command()?;
        Ok(Snapshot {
            instruction_pointer: self.instruction_pointer,
            input_pointer: self.input_pointer,
            output: self.output.clone(),
            registers: self.registers.clone(),
            command,
        })
    }

    /// Replaces pointer, tapes and registers with a snapshot's copies.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.instruction_pointer = snapshot.instruction_pointer;
        self.input_pointer = snapshot.input_pointer;
        self.output.clone_from(&snapshot.output);
        self.registers.clone_from(&snapshot.registers);
    }

    fn evaluate(&self, command: &Command) -> Result<Effect, Fault> {
        let Command {
            instruction,
            operand,
            line,
        } = *command;

        if operand.is_indirect() && !instruction.allows_indirection() {
            return Err(Fault::IllegalOperand {
                line,
                instruction,
                operand: operand.to_string(),
            });
        }

        let resolve = || {
            operand
                .resolve(&self.registers)
                .map_err(|NegativeAddress(value)| Fault::InvalidAddress { line, value })
        };
        let accumulator = self.registers.accumulator();
        let mut effect = Effect::default();

        match instruction {
            Instruction::Read => {
                let address = resolve()?.address;
                let value = self.input.get(self.input_pointer).copied().ok_or(
                    Fault::InputExhausted {
                        line,
                        position: self.input_pointer,
                    },
                )?;
                effect.register_write = Some((address, value));
                effect.consumes_input = true;
            }
            Instruction::Write => {
                effect.output = Some(self.registers.get(resolve()?.address));
            }
            Instruction::Load => {
                effect.register_write = Some((ACCUMULATOR, resolve()?.value));
            }
            Instruction::Store => {
                effect.register_write = Some((resolve()?.address, accumulator));
            }
            Instruction::Add => {
                effect.register_write =
                    Some((ACCUMULATOR, accumulator.wrapping_add(resolve()?.value)));
            }
            Instruction::Sub => {
                effect.register_write =
                    Some((ACCUMULATOR, accumulator.wrapping_sub(resolve()?.value)));
            }
            Instruction::Mul => {
                effect.register_write =
                    Some((ACCUMULATOR, accumulator.wrapping_mul(resolve()?.value)));
            }
            Instruction::Div => {
                let divisor = resolve()?.value;
                if divisor == 0 {
                    return Err(Fault::DivisionByZero { line });
                }
                effect.register_write = Some((ACCUMULATOR, accumulator.wrapping_div(divisor)));
            }
            Instruction::Goto => {
                effect.jump = Some(line_number(resolve()?.address));
            }
            Instruction::Jz => {
                let target = resolve()?.address;
                if accumulator == 0 {
                    effect.jump = Some(line_number(target));
                }
            }
            Instruction::Jgtz => {
                let target = resolve()?.address;
                if accumulator > 0 {
                    effect.jump = Some(line_number(target));
                }
            }
            // The operand is never read, so it cannot fault.
            Instruction::Halt => {
                effect.jump = Some(HALTED);
            }
        }

        Ok(effect)
    }

    fn commit(&mut self, effect: Effect) {
        if let Some((address, value)) = effect.register_write {
            self.registers.set(address, value);
        }
        if let Some(value) = effect.output {
            self.output.push(value);
        }
        if effect.consumes_input {
            self.input_pointer += 1;
        }
        self.instruction_pointer = effect
            .jump
            .unwrap_or_else(|| self.instruction_pointer.saturating_add(1));
    }
}

/// Jump targets beyond `usize` can never name a line; saturate so the next
/// fetch reports them as missing.
fn line_number(address: Address) -> usize {
    usize::try_from(address).unwrap_or(usize::MAX)
}
