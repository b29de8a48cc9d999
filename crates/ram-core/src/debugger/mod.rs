//! Time-travel debugger wrapped around the engine's step boundary.
//!
//! Before every command executes, the [`Debugger`] records a [`Snapshot`] of
//! the engine into an append-only history. Rendering and operator interaction
//! go through the [`DebugConsole`] seam, so the state machine runs without a
//! terminal.

mod command;
mod render;

use std::time::Duration;

pub use command::{DebugCommand, DebuggerCommandError};
pub use render::{render_frame, render_states, HELP_TEXT};

use crate::{ConfigError, Fault, Machine, SimulatorConfig, Snapshot, StepOutcome};

/// Host side of the debugger: where frames go and commands come from.
pub trait DebugConsole {
    /// Displays a rendered frame or message.
    fn show(&mut self, text: &str);

    /// Blocks for the next operator line. `None` means input is closed.
    fn read_command(&mut self) -> Option<String>;

    /// Blocks between frames in non-interactive mode.
    fn pause(&mut self, delay: Duration);
}

/// Console that discards output, never sleeps and has no operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentConsole;

impl DebugConsole for SilentConsole {
    fn show(&mut self, _text: &str) {}

    fn read_command(&mut self) -> Option<String> {
        None
    }

    fn pause(&mut self, _delay: Duration) {}
}

/// Debugger finite-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebuggerState {
    /// Stepping normally, rendering when configured to.
    Running,
    /// Stepping silently until the instruction pointer reaches the line.
    SuspendedUntil(usize),
    /// Stepping silently until the program halts.
    Continuing,
    /// Frame rendered, waiting for an operator command.
    PausedForInput,
    /// The operator ended the session.
    Terminated,
}

/// What the prompt loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandOutcome {
    /// Execute the pending command.
    Resume,
    /// Keep prompting.
    Stay,
    /// End the session.
    Exit,
}

/// Result of one debugger step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugOutcome {
    /// The engine executed a command.
    Stepped(StepOutcome),
    /// The operator ended the session; nothing executed.
    Exited,
}

/// How a debugger session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEnd {
    /// The program executed `HALT` (or jumped to line 0).
    Halted,
    /// The operator issued `exit` or closed input.
    Exited,
}

/// Engine wrapper that records history and talks to an operator.
#[derive(Debug, Clone)]
pub struct Debugger {
    machine: Machine,
    config: SimulatorConfig,
    delay: Duration,
    history: Vec<Snapshot>,
    state: DebuggerState,
    /// Set by a rollback: the last history entry already describes the
    /// pending command, so the next step must not record it again.
    resume_from_history: bool,
}

impl Debugger {
    /// Wraps a machine.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(machine: Machine, config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let delay = config.delay()?;
        Ok(Self {
            machine,
            config,
            delay,
            history: Vec::new(),
            state: DebuggerState::Running,
            resume_from_history: false,
        })
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Releases the wrapped engine.
    #[must_use]
    pub fn into_machine(self) -> Machine {
        self.machine
    }

    /// Recorded snapshots, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Current state-machine state.
    #[must_use]
    pub const fn state(&self) -> DebuggerState {
        self.state
    }

    /// Records a snapshot, renders or prompts as configured, then executes
    /// one command.
    ///
    /// # Errors
    ///
    /// Propagates engine [`Fault`]s, and returns
    /// [`Fault::InstructionLimitExceeded`] once the history outgrows
    /// `max_instructions`.
    pub fn step(&mut self, console: &mut dyn DebugConsole) -> Result<DebugOutcome, Fault> {
        if self.state == DebuggerState::Terminated {
            return Ok(DebugOutcome::Exited);
        }

        if self.resume_from_history {
            self.resume_from_history = false;
        } else {
            self.capture()?;
        }

        if self.should_render() && self.present(console) == CommandOutcome::Exit {
            return Ok(DebugOutcome::Exited);
        }

        self.machine.step().map(DebugOutcome::Stepped)
    }

    /// Steps until the program halts or the operator exits.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Fault`].
    pub fn run(&mut self, console: &mut dyn DebugConsole) -> Result<SessionEnd, Fault> {
        while !self.machine.is_halted() {
            if self.step(console)? == DebugOutcome::Exited {
                return Ok(SessionEnd::Exited);
            }
        }
        Ok(SessionEnd::Halted)
    }

    /// Restores the engine from snapshot `index` and drops every later
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DebuggerCommandError::SnapshotOutOfRange`] without touching
    /// any state when `index` is not in the history.
    pub fn rollback(&mut self, index: usize) -> Result<(), DebuggerCommandError> {
        let snapshot = self
            .history
            .get(index)
            .cloned()
            .ok_or(DebuggerCommandError::SnapshotOutOfRange {
                index,
                len: self.history.len(),
            })?;

        self.history.truncate(index + 1);
        self.machine.restore(&snapshot);
        self.resume_from_history = true;
        log::debug!("rolled back to snapshot {index} ({})", snapshot.command);
        Ok(())
    }

    /// Arms a one-shot breakpoint: rendering stops until the instruction
    /// pointer reaches `line`. Line 0 is never reached, so it silences the
    /// rest of the run.
    ///
    /// # Errors
    ///
    /// Returns [`DebuggerCommandError::LineOutOfRange`] for lines outside the
    /// program other than 0.
    pub fn suspend_until(&mut self, line: usize) -> Result<(), DebuggerCommandError> {
        self.check_breakpoint_line(line)?;
        self.state = DebuggerState::SuspendedUntil(line);
        log::debug!("breakpoint armed at line {line}");
        Ok(())
    }

    /// Stops rendering until the program halts.
    pub fn continue_silently(&mut self) {
        self.state = DebuggerState::Continuing;
        log::debug!("continuing without rendering");
    }

    /// Renders the current frame.
    #[must_use]
    pub fn frame(&self) -> String {
        render_frame(
            &self.history,
            self.machine.registers(),
            self.config.num_of_lines_logged,
        )
    }

    /// Applies one operator command line.
    ///
    /// # Errors
    ///
    /// Returns a [`DebuggerCommandError`] for malformed or out-of-range
    /// commands; state is unchanged in that case.
    pub fn handle_command(
        &mut self,
        line: &str,
        console: &mut dyn DebugConsole,
    ) -> Result<CommandOutcome, DebuggerCommandError> {
        let command: DebugCommand = line.parse()?;
        log::debug!("operator command: {}", command.name());

        match command {
            DebugCommand::Step => Ok(CommandOutcome::Resume),
            DebugCommand::Help => {
                console.show(HELP_TEXT);
                Ok(CommandOutcome::Stay)
            }
            DebugCommand::Exit => Ok(CommandOutcome::Exit),
            DebugCommand::Continue => {
                self.continue_silently();
                Ok(CommandOutcome::Resume)
            }
            DebugCommand::States => {
                console.show(&render_states(&self.history));
                Ok(CommandOutcome::Stay)
            }
            DebugCommand::Reset => {
                self.rollback(0)?;
                console.show(&self.frame());
                Ok(CommandOutcome::Stay)
            }
            DebugCommand::Rollback(index) => {
                self.rollback(index)?;
                console.show(&self.frame());
                Ok(CommandOutcome::Stay)
            }
            DebugCommand::SuspendUntil(target) => {
                self.check_breakpoint_line(target)?;
                console.show(&format!("suspend until line {target}? [y/N]"));
                let confirmed = console
                    .read_command()
                    .is_some_and(|answer| is_affirmative(&answer));
                if !confirmed {
                    console.show("breakpoint not set");
                    return Ok(CommandOutcome::Stay);
                }
                self.suspend_until(target)?;
                Ok(CommandOutcome::Resume)
            }
        }
    }

    fn check_breakpoint_line(&self, line: usize) -> Result<(), DebuggerCommandError> {
        let program = self.machine.program();
        if line == 0 || program.contains_line(line) {
            Ok(())
        } else {
            Err(DebuggerCommandError::LineOutOfRange {
                line,
                program_len: program.len(),
            })
        }
    }

    fn capture(&mut self) -> Result<(), Fault> {
        let snapshot = self.machine.snapshot()?;
        self.history.push(snapshot);
        let limit = self.config.max_instructions;
        if self.history.len() > limit {
            log::warn!("history exceeded {limit} snapshots; aborting run");
            return Err(Fault::InstructionLimitExceeded { limit });
        }
        Ok(())
    }

    fn should_render(&mut self) -> bool {
        if !self.config.renders() {
            return false;
        }
        match self.state {
            DebuggerState::Running | DebuggerState::PausedForInput => true,
            DebuggerState::SuspendedUntil(target) => {
                if self.machine.instruction_pointer() == target {
                    log::debug!("breakpoint hit at line {target}");
                    self.state = DebuggerState::Running;
                    true
                } else {
                    false
                }
            }
            DebuggerState::Continuing | DebuggerState::Terminated => false,
        }
    }

    fn present(&mut self, console: &mut dyn DebugConsole) -> CommandOutcome {
        console.show(&self.frame());
        if !self.config.debug {
            console.pause(self.delay);
            return CommandOutcome::Resume;
        }

        self.state = DebuggerState::PausedForInput;
        loop {
            let Some(line) = console.read_command() else {
                self.state = DebuggerState::Terminated;
                return CommandOutcome::Exit;
            };
            match self.handle_command(&line, console) {
                Ok(CommandOutcome::Stay) => {}
                Ok(CommandOutcome::Resume) => {
                    // The pending command is the last history entry, even
                    // after a rollback inside this prompt.
                    self.resume_from_history = false;
                    if self.state == DebuggerState::PausedForInput {
                        self.state = DebuggerState::Running;
                    }
                    return CommandOutcome::Resume;
                }
                Ok(CommandOutcome::Exit) => {
                    self.state = DebuggerState::Terminated;
                    return CommandOutcome::Exit;
                }
                Err(error) => console.show(&format!("error: {error}")),
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
