//! CLI entry point for the `ram-sim` binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use log::LevelFilter;
use ram_cli::{
    listing, load_program, load_tape, parse_tape, resolve_config, run_session, CliError,
    ConfigOverrides, TerminalConsole,
};
use ram_core::{SessionEnd, Value};
use serde_json as _;
use simple_logger::SimpleLogger;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: ram-sim <command> [options]

Commands:
  run   <program> [options]  Run a program and print its output tape
  check <program>            Compile a program and print the numbered listing

Options (run):
  -i, --input <file>          Read the input tape from a file
  -t, --tape <values>         Input tape given inline, e.g. \"4,5,6\"
  -c, --config <file>         JSON configuration file
  -d, --debug                 Step interactively at a debugger prompt
  -l, --logging               Render a frame before every step
      --max-instructions <n>  Abort once more than <n> steps are recorded
  -v, --verbose               Log diagnostics to stderr
  -h, --help                  Show this help message

Examples:
  ram-sim run factorial.ram --tape 5
  ram-sim run factorial.ram -i input.txt --debug
  ram-sim check factorial.ram
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Check(CheckArgs),
}

#[derive(Debug, PartialEq, Eq)]
enum TapeSource {
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    tape: Option<TapeSource>,
    config: Option<PathBuf>,
    overrides: ConfigOverrides,
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct CheckArgs {
    program: PathBuf,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "check" => parse_check_args(args)
            .map(Command::Check)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn option_value(
    args: &mut impl Iterator<Item = OsString>,
    option: &OsString,
) -> Result<OsString, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {}", option.to_string_lossy()))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut program: Option<PathBuf> = None;
    let mut tape: Option<TapeSource> = None;
    let mut config: Option<PathBuf> = None;
    let mut overrides = ConfigOverrides::default();
    let mut verbose = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--debug" || arg == "-d" {
            overrides.debug = true;
            continue;
        }

        if arg == "--logging" || arg == "-l" {
            overrides.logging = true;
            continue;
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "--input" || arg == "-i" || arg == "--tape" || arg == "-t" {
            if tape.is_some() {
                return Err("input tape given more than once".to_string());
            }
            let value = option_value(&mut args, &arg)?;
            tape = Some(if arg == "--input" || arg == "-i" {
                TapeSource::File(PathBuf::from(value))
            } else {
                TapeSource::Inline(value.to_string_lossy().to_string())
            });
            continue;
        }

        if arg == "--config" || arg == "-c" {
            config = Some(PathBuf::from(option_value(&mut args, &arg)?));
            continue;
        }

        if arg == "--max-instructions" {
            let value = option_value(&mut args, &arg)?;
            let limit = value.to_string_lossy().parse::<usize>().map_err(|_| {
                format!(
                    "invalid value for --max-instructions: {}",
                    value.to_string_lossy()
                )
            })?;
            overrides.max_instructions = Some(limit);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(RunArgs {
        program,
        tape,
        config,
        overrides,
        verbose,
    })
}

fn parse_check_args(args: impl Iterator<Item = OsString>) -> Result<CheckArgs, String> {
    let mut program: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(CheckArgs { program })
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(error) = SimpleLogger::new().with_level(level).init() {
        eprintln!("warning: logging unavailable: {error}");
    }
}

fn load_input(tape: Option<&TapeSource>) -> Result<Vec<Value>, CliError> {
    match tape {
        None => Ok(Vec::new()),
        Some(TapeSource::File(path)) => load_tape(path),
        Some(TapeSource::Inline(values)) => parse_tape(values),
    }
}

fn run_program(args: &RunArgs) -> Result<(), CliError> {
    let program = load_program(&args.program)?;
    let input = load_input(args.tape.as_ref())?;
    let config = resolve_config(args.config.as_deref(), args.overrides)?;

    let stdout = io::stdout();
    let redraw = config.logging && !config.debug && stdout.is_terminal();
    let mut console = TerminalConsole::new(io::stdin().lock(), stdout).with_redraw(redraw);
    let report = run_session(program, input, config, &mut console)?;

    if report.end == SessionEnd::Halted {
        for value in &report.output {
            println!("{value}");
        }
    }
    Ok(())
}

fn check_program(args: &CheckArgs) -> Result<(), CliError> {
    let program = load_program(&args.program)?;
    print!("{}", listing(&program));
    Ok(())
}

fn report(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => {
            init_logging(args.verbose);
            report(run_program(&args))
        }
        Ok(ParseResult::Command(Command::Check(args))) => {
            init_logging(false);
            report(check_program(&args))
        }
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
