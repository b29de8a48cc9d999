#![no_main]

use libfuzzer_sys::fuzz_target;
use ram_core::{compile, DebugCommand, Debugger, Machine, SilentConsole, SimulatorConfig};

const STEP_BUDGET: usize = 256;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for line in text.lines() {
        let _ = line.parse::<DebugCommand>();
    }

    let Ok(program) = compile(text.lines()) else {
        return;
    };
    let input: Vec<i64> = data.iter().map(|&byte| i64::from(byte) - 128).collect();

    let mut machine = Machine::new(program.clone(), input.clone());
    let _ = machine.run(STEP_BUDGET);

    let config = SimulatorConfig {
        max_instructions: STEP_BUDGET,
        ..SimulatorConfig::default()
    };
    if let Ok(mut debugger) = Debugger::new(Machine::new(program, input), config) {
        let _ = debugger.run(&mut SilentConsole);
        if !debugger.history().is_empty() {
            let _ = debugger.rollback(debugger.history().len() / 2);
            let _ = debugger.run(&mut SilentConsole);
        }
    }
});
