//! Runs the factorial program under the debugger and prints every frame plus
//! the final snapshot listing.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p ram-core --example factorial_trace -- 5
//! ```

#![allow(clippy::pedantic)]

use std::time::Duration;

use log as _;
use proptest as _;
use ram_core::{
    render_states, DebugConsole, Debugger, Machine, Program, SessionEnd, SimulatorConfig,
};
use rstest as _;
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

struct StdoutConsole;

impl DebugConsole for StdoutConsole {
    fn show(&mut self, text: &str) {
        println!("{text}");
    }

    fn read_command(&mut self) -> Option<String> {
        None
    }

    fn pause(&mut self, _delay: Duration) {}
}

fn main() {
    let n = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<i64>().ok())
        .unwrap_or(5);

    let program: Program = FACTORIAL.parse().expect("factorial compiles");
    let config = SimulatorConfig {
        logging: true,
        timeout_seconds: 0.0,
        num_of_lines_logged: 5,
        ..SimulatorConfig::default()
    };
    let mut debugger =
        Debugger::new(Machine::new(program, vec![n]), config).expect("config is valid");

    match debugger.run(&mut StdoutConsole) {
        Ok(SessionEnd::Halted) => {}
        Ok(SessionEnd::Exited) => unreachable!("no operator is attached"),
        Err(fault) => {
            eprintln!("fault: {fault}");
            std::process::exit(1);
        }
    }

    println!("{}", render_states(debugger.history()));
    println!("{n}! = {:?}", debugger.machine().output());
}
