//! Session driver: builds the engine, wraps it in the debugger and runs it.

use ram_core::{DebugConsole, Debugger, Machine, Program, SessionEnd, SimulatorConfig, Value};

use crate::CliError;

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Why the session ended.
    pub end: SessionEnd,
    /// Output tape at the end of the session.
    pub output: Vec<Value>,
    /// Snapshots recorded, one per executed or pending command.
    pub steps: usize,
}

/// Runs `program` against `input` until it halts or the operator exits.
///
/// # Errors
///
/// Returns [`CliError::Config`] for invalid options and [`CliError::Fault`]
/// when the program faults.
pub fn run_session(
    program: Program,
    input: Vec<Value>,
    config: SimulatorConfig,
    console: &mut dyn DebugConsole,
) -> Result<SessionReport, CliError> {
    let mut debugger = Debugger::new(Machine::new(program, input), config)?;
    let end = debugger.run(console)?;
    log::debug!(
        "session ended ({end:?}) after {} snapshot(s)",
        debugger.history().len()
    );

    let steps = debugger.history().len();
    Ok(SessionReport {
        end,
        output: debugger.into_machine().output().to_vec(),
        steps,
    })
}

/// Compiled listing, one `line: INSTRUCTION operand` row per command.
#[must_use]
pub fn listing(program: &Program) -> String {
    program.iter().map(|command| format!("{command}\n")).collect()
}

#[cfg(test)]
mod tests {
    use ram_core::{Fault, Program, SessionEnd, SilentConsole, SimulatorConfig};

    use super::{listing, run_session, SessionReport};
    use crate::CliError;

    fn program(text: &str) -> Program {
        text.parse().expect("test program compiles")
    }

    #[test]
    fn silent_session_reports_output_and_steps() {
        let report = run_session(
            program("READ 1\nWRITE 1\nHALT"),
            vec![7],
            SimulatorConfig::default(),
            &mut SilentConsole,
        )
        .expect("program halts");

        assert_eq!(
            report,
            SessionReport {
                end: SessionEnd::Halted,
                output: vec![7],
                steps: 3,
            }
        );
    }

    #[test]
    fn runaway_program_hits_the_cap() {
        let config = SimulatorConfig {
            max_instructions: 10,
            ..SimulatorConfig::default()
        };
        let error = run_session(program("GOTO 1"), Vec::new(), config, &mut SilentConsole)
            .expect_err("loop never halts");
        assert!(matches!(
            error,
            CliError::Fault(Fault::InstructionLimitExceeded { limit: 10 })
        ));
    }

    #[test]
    fn listing_numbers_every_command() {
        assert_eq!(
            listing(&program("read 1\n  mult **2\nhalt")),
            "1: READ 1\n2: MUL **2\n3: HALT 0\n"
        );
    }
}
