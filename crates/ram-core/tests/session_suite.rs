//! Whole-session coverage: a real program driven through the debugger with a
//! scripted operator.

#![allow(clippy::pedantic, clippy::nursery)]

use std::collections::VecDeque;
use std::time::Duration;

use log as _;
use proptest as _;
use ram_core::{
    DebugConsole, Debugger, DebuggerState, Fault, Machine, Program, SessionEnd, SimulatorConfig,
};
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const FACTORIAL: &str = "\
READ 1
LOAD 1
STORE 2
LOAD *1
JZ 13
LOAD *2
MUL *1
STORE 2
LOAD *1
SUB 1
STORE 1
GOTO 4
WRITE 2
HALT";

#[derive(Default)]
struct ScriptedOperator {
    commands: VecDeque<String>,
    shown: Vec<String>,
    pauses: Vec<Duration>,
}

impl ScriptedOperator {
    fn new(commands: &[&str]) -> Self {
        Self {
            commands: commands.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn frames(&self) -> Vec<&String> {
        self.shown
            .iter()
            .filter(|text| text.starts_with("registers:"))
            .collect()
    }
}

impl DebugConsole for ScriptedOperator {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn read_command(&mut self) -> Option<String> {
        self.commands.pop_front()
    }

    fn pause(&mut self, delay: Duration) {
        self.pauses.push(delay);
    }
}

fn factorial_session(n: i64, config: SimulatorConfig) -> Debugger {
    let program: Program = FACTORIAL.parse().expect("factorial compiles");
    Debugger::new(Machine::new(program, vec![n]), config).expect("valid config")
}

fn interactive() -> SimulatorConfig {
    SimulatorConfig {
        debug: true,
        ..SimulatorConfig::default()
    }
}

fn reference_steps(n: i64) -> usize {
    let program: Program = FACTORIAL.parse().expect("factorial compiles");
    Machine::new(program, vec![n])
        .run(10_000)
        .expect("factorial halts")
        .steps
}

#[rstest]
#[case(3, 6)]
#[case(5, 120)]
fn rewinding_mid_session_still_computes_the_same_result(#[case] n: i64, #[case] expected: i64) {
    let mut session = factorial_session(n, interactive());
    let mut operator = ScriptedOperator::new(&["", "step", "rollback 0", "continue"]);

    assert_eq!(session.run(&mut operator), Ok(SessionEnd::Halted));
    assert_eq!(session.machine().output(), &[expected]);
    assert_eq!(session.history().len(), reference_steps(n));
    assert_eq!(session.state(), DebuggerState::Continuing);
}

#[test]
fn timed_logging_uses_the_configured_delay() {
    let config = SimulatorConfig {
        logging: true,
        timeout_seconds: 0.25,
        num_of_lines_logged: 4,
        ..SimulatorConfig::default()
    };
    let mut session = factorial_session(2, config);
    let mut operator = ScriptedOperator::default();

    assert_eq!(session.run(&mut operator), Ok(SessionEnd::Halted));
    let steps = reference_steps(2);
    assert_eq!(operator.pauses.len(), steps);
    assert!(operator
        .pauses
        .iter()
        .all(|delay| *delay == Duration::from_millis(250)));
    assert!(operator
        .frames()
        .iter()
        .all(|frame| frame.lines().count() == 6));
}

#[test]
fn breakpoint_pauses_on_the_requested_line() {
    let mut session = factorial_session(4, interactive());
    let mut operator = ScriptedOperator::new(&["suspenduntil 13", "y", "exit"]);

    assert_eq!(session.run(&mut operator), Ok(SessionEnd::Exited));
    assert_eq!(session.machine().instruction_pointer(), 13);
    assert!(session.machine().output().is_empty());
    assert_eq!(session.machine().registers().get(2), 24);

    let frames = operator.frames();
    assert_eq!(frames.len(), 2);
    assert!(frames[1].contains("13: WRITE 2\n"));
    assert!(operator
        .shown
        .iter()
        .any(|text| text == "suspend until line 13? [y/N]"));
}

#[test]
fn suspending_until_line_zero_silences_the_rest_of_the_run() {
    let mut session = factorial_session(4, interactive());
    let mut operator = ScriptedOperator::new(&["suspenduntil 0", "y", "exit"]);

    assert_eq!(session.run(&mut operator), Ok(SessionEnd::Halted));
    assert_eq!(session.machine().output(), &[24]);
    assert_eq!(session.history().len(), reference_steps(4));
    assert_eq!(session.state(), DebuggerState::SuspendedUntil(0));

    // Only the opening frame is drawn and the trailing command is never read.
    assert_eq!(operator.frames().len(), 1);
    assert_eq!(operator.commands, ["exit"]);
    assert!(operator
        .shown
        .iter()
        .any(|text| text == "suspend until line 0? [y/N]"));
}

#[test]
fn fault_inside_a_session_leaves_the_history_for_inspection() {
    let program: Program = "READ 1\nLOAD 9\nDIV *1\nHALT".parse().expect("compiles");
    let mut session =
        Debugger::new(Machine::new(program, vec![0]), SimulatorConfig::default()).expect("valid");
    let mut operator = ScriptedOperator::default();

    assert_eq!(
        session.run(&mut operator),
        Err(Fault::DivisionByZero { line: 3 })
    );
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.machine().instruction_pointer(), 3);

    session.rollback(1).expect("snapshot 1 exists");
    assert_eq!(session.machine().instruction_pointer(), 2);
    assert_eq!(session.machine().registers().accumulator(), 0);
}

#[test]
fn closing_operator_input_exits_before_anything_runs() {
    let mut session = factorial_session(4, interactive());
    assert_eq!(
        session.run(&mut ScriptedOperator::default()),
        Ok(SessionEnd::Exited)
    );
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.machine().input_pointer(), 0);
    assert_eq!(session.state(), DebuggerState::Terminated);
}
