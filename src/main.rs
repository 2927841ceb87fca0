//! Intcode VM - CLI Entry Point
//!
//! Commands:
//! - `intcode run <program>` - Run a program with scripted or interactive input
//! - `intcode disasm <program>` - Disassemble a program
//! - `intcode paint <program>` - Drive the hull painting robot
//! - `intcode arcade <program>` - Drive the arcade cabinet
//! - `intcode debug <program>` - Interactive debugger
//! - `intcode test` - Built-in self-test

use clap::{Parser, Subcommand};
use intcode::devices::arcade::{self, Tile};
use intcode::devices::robot::{PanelColor, Robot};
use intcode::{
    Arcade, CapturedOutput, ExecError, Execution, Io, Memory, Ports, Program, ScriptedInput, StdinInput,
    StdoutOutput, DEFAULT_CEILING,
};
use num_bigint::BigInt;

#[derive(Parser)]
#[command(name = "intcode")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "An Intcode virtual machine with arbitrary-precision memory")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the program text
        program: String,
        /// Comma-separated input values
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<BigInt>,
        /// Read input from stdin, one value per line
        #[arg(long, conflicts_with = "input")]
        interactive: bool,
        /// Maximum number of instructions to run
        #[arg(short, long)]
        max_steps: Option<u64>,
        /// Largest address memory may grow to
        #[arg(long, default_value_t = DEFAULT_CEILING)]
        memory_ceiling: usize,
        /// Trace every instruction (sets the log level to trace)
        #[arg(short, long)]
        trace: bool,
        /// Write the final machine state as JSON
        #[arg(long)]
        dump: Option<String>,
    },
    /// Disassemble a program to readable text
    Disasm {
        /// Path to the program text
        program: String,
    },
    /// Run the hull painting robot
    Paint {
        /// Start on a white panel instead of a black one
        #[arg(long)]
        start_white: bool,
        /// Path to the program text
        program: String,
    },
    /// Run the arcade cabinet
    Arcade {
        /// Insert quarters and play the game to the end
        #[arg(long)]
        play: bool,
        /// Path to the program text
        program: String,
    },
    /// Interactive debugger
    Debug {
        /// Path to the program text
        program: String,
        /// Comma-separated input values
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<BigInt>,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    let level = match &cli.command {
        Some(Commands::Run { trace: true, .. }) => log::LevelFilter::Trace,
        _ => cli.log_level,
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("warning: logger unavailable: {}", e);
    }

    match cli.command {
        Some(Commands::Run { program, input, interactive, max_steps, memory_ceiling, dump, .. }) => {
            let options = RunOptions { max_steps, memory_ceiling, dump };
            run_program(&program, input, interactive, &options);
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        Some(Commands::Paint { program, start_white }) => {
            paint(&program, start_white);
        }
        Some(Commands::Arcade { program, play }) => {
            run_arcade(&program, play);
        }
        Some(Commands::Debug { program, input }) => {
            debug_program(&program, input);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Intcode VM v0.1.0");
            println!();
            println!("Use --help for available commands");
        }
    }
}

fn load(path: &str) -> Program {
    match Program::load(path) {
        Ok(program) => {
            log::info!("loaded {} words from {}", program.len(), path);
            program
        }
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    }
}

struct RunOptions {
    max_steps: Option<u64>,
    memory_ceiling: usize,
    dump: Option<String>,
}

fn run_program(path: &str, input: Vec<BigInt>, interactive: bool, options: &RunOptions) {
    let program = load(path);
    let mut memory = program.memory();
    memory.set_ceiling(options.memory_ceiling);

    if interactive {
        let exec = Execution::new(memory, Ports::new(StdinInput::new(), StdoutOutput::new()));
        finish(exec, options);
    } else {
        let exec = Execution::new(memory, Ports::new(ScriptedInput::new(input), StdoutOutput::new()));
        finish(exec, options);
    }
}

fn finish<D: Io>(mut exec: Execution<D>, options: &RunOptions) {
    let result = match options.max_steps {
        Some(max) => exec.run_limited(max).map(|_| ()),
        None => exec.run_to_completion().map(|_| ()),
    };

    if let Some(path) = &options.dump {
        dump_snapshot(&exec, path);
    }

    if let Err(e) = result {
        eprintln!("❌ Error at IP={}: {}", exec.instruction_pointer(), e);
        std::process::exit(1);
    }

    if exec.is_running() {
        eprintln!(
            "⚠️  Stopped after {} steps at IP={}. Use --max-steps to increase.",
            exec.steps(),
            exec.instruction_pointer()
        );
    }
}

fn dump_snapshot<D>(exec: &Execution<D>, path: &str) {
    let written = serde_json::to_string_pretty(&exec.snapshot())
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));

    if let Err(e) = written {
        eprintln!("❌ Failed to write {}: {}", path, e);
        std::process::exit(1);
    }
}

fn disassemble_file(path: &str) {
    let program = load(path);
    print!("{}", intcode::disassemble(program.words()));
}

fn paint(path: &str, start_white: bool) {
    let program = load(path);
    let robot = if start_white {
        Robot::starting_on(PanelColor::White)
    } else {
        Robot::new()
    };

    let mut exec = program.execution(robot);
    if let Err(e) = exec.run_to_completion() {
        eprintln!("❌ Robot error at IP={}: {}", exec.instruction_pointer(), e);
        std::process::exit(1);
    }

    let robot = exec.io();
    println!("Painted panels: {}", robot.painted_panels());
    println!();
    println!("{}", robot.render());
}

fn run_arcade(path: &str, play: bool) {
    let program = load(path);

    let result = if play {
        arcade::play(&program)
    } else {
        draw_only(&program)
    };

    match result {
        Ok(screen) => {
            println!("{}", screen.render());
            println!();
            println!("Blocks: {}", screen.count(Tile::Block));
            println!("Score:  {}", screen.score());
        }
        Err(e) => {
            eprintln!("❌ Arcade error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run without a joystick, keeping whatever was drawn before the program
/// halts or first asks for input.
fn draw_only(program: &Program) -> Result<Arcade, ExecError> {
    let mut executor = program.blockable_executor(Ports::new(ScriptedInput::empty(), Arcade::new()));
    executor.execute_until_block()?;
    Ok(executor.into_execution().into_parts().1.output)
}

#[cfg(feature = "tui")]
fn debug_program(path: &str, input: Vec<BigInt>) {
    let program = load(path);

    if let Err(e) = intcode::run_debugger(program, input) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_program(_path: &str, _input: Vec<BigInt>) {
    eprintln!("❌ The debugger needs the `tui` feature");
    std::process::exit(1);
}

fn run_captured(words: Vec<i64>, input: Vec<i64>) -> Result<(Memory, Vec<BigInt>), ExecError> {
    let program = Program::from(words);
    let mut exec = program.execution(Ports::new(ScriptedInput::new(input), CapturedOutput::new()));
    exec.run_to_completion()?;
    let (memory, ports) = exec.into_parts();
    Ok((memory, ports.output.into_values()))
}

fn check(name: &str, ok: bool, passed: &mut u32, failed: &mut u32) {
    print!("{}... ", name);
    if ok {
        println!("✓");
        *passed += 1;
    } else {
        println!("✗");
        *failed += 1;
    }
}

fn run_self_test() {
    println!("━━━ Intcode VM Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let ok = matches!(
        run_captured(vec![99], vec![]),
        Ok((memory, out)) if out.is_empty() && memory.cells() == [BigInt::from(99)]
    );
    check("Halt only", ok, &mut passed, &mut failed);

    let ok = matches!(
        run_captured(vec![1, 0, 0, 0, 99], vec![]),
        Ok((memory, _)) if memory.read(0) == BigInt::from(2)
    );
    check("Self-modifying add", ok, &mut passed, &mut failed);

    let ok = matches!(
        run_captured(vec![3, 0, 4, 0, 99], vec![-42]),
        Ok((_, out)) if out == [BigInt::from(-42)]
    );
    check("Input echo", ok, &mut passed, &mut failed);

    let ok = matches!(
        run_captured(vec![109, 7, 203, 0, 204, 0, 99], vec![7]),
        Ok((memory, out)) if out == [BigInt::from(7)] && memory.read(7) == BigInt::from(7)
    );
    check("Relative mode round trip", ok, &mut passed, &mut failed);

    let ok = matches!(
        run_captured(vec![1102, 34915192, 34915192, 7, 4, 7, 99, 0], vec![]),
        Ok((_, out)) if out.len() == 1 && out[0].to_string().len() == 16
    );
    check("16-digit product", ok, &mut passed, &mut failed);

    let ok = matches!(
        run_captured(vec![104, 1125899906842624, 99], vec![]),
        Ok((_, out)) if out == [BigInt::from(1125899906842624i64)]
    );
    check("Large immediate output", ok, &mut passed, &mut failed);

    let quine = vec![109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99];
    let expected: Vec<BigInt> = quine.iter().copied().map(BigInt::from).collect();
    let ok = matches!(run_captured(quine, vec![]), Ok((_, out)) if out == expected);
    check("Quine", ok, &mut passed, &mut failed);

    let mut executor = Program::from(vec![3, 9, 4, 9, 3, 9, 4, 9, 99, 0])
        .blockable_executor(Ports::new(ScriptedInput::empty(), CapturedOutput::new()));
    let first = executor.execute_until_block_with(ScriptedInput::new([5])).map(|o| o.drain());
    let second = executor.execute_until_block_with(ScriptedInput::new([6])).map(|o| o.drain());
    let ok = matches!(
        (first, second),
        (Ok(a), Ok(b)) if a == [BigInt::from(5)] && b == [BigInt::from(6)]
    ) && executor.is_halted();
    check("Blocking input", ok, &mut passed, &mut failed);

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
