//! Debugger application state and logic.

use crate::io::{CapturedOutput, Ports, ScriptedInput};
use crate::program::{disassemble_instruction, Program};
use crate::vm::{Execution, Opcode};
use num_bigint::BigInt;
use std::collections::HashSet;

pub type DebugPorts = Ports<ScriptedInput, CapturedOutput>;

/// Debugger application state.
pub struct DebuggerApp {
    /// The execution being debugged.
    pub exec: Execution<DebugPorts>,
    /// Original program for reference.
    pub program: Program,
    /// Input queued from the command line.
    pub input: Vec<BigInt>,
    /// Breakpoints (by address).
    pub breakpoints: HashSet<usize>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Memory view scroll offset.
    pub mem_scroll: usize,
}

impl DebuggerApp {
    /// Create a new debugger with a loaded program.
    pub fn new(program: Program, input: Vec<BigInt>) -> Self {
        let exec = Self::start(&program, &input);

        Self {
            exec,
            program,
            input,
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            mem_scroll: 0,
        }
    }

    fn start(program: &Program, input: &[BigInt]) -> Execution<DebugPorts> {
        program.execution(Ports::new(ScriptedInput::new(input.iter().cloned()), CapturedOutput::new()))
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        if !self.exec.is_running() {
            self.status = format!("Halted after {} steps", self.exec.steps());
            self.running = false;
            return;
        }

        if !self.exec.is_non_blocking() {
            self.status = "Waiting for input: the scripted input is exhausted".into();
            self.running = false;
            return;
        }

        let ip = self.exec.instruction_pointer();
        let (text, _) = disassemble_instruction(self.exec.memory().cells(), ip);
        match self.exec.step() {
            Ok(Opcode::Output) => {
                let last = self.exec.io().output.last().map(|v| v.to_string()).unwrap_or_default();
                self.status = format!("IP={:04}: {}  => {}", ip, text, last);
            }
            Ok(_) => {
                self.status = format!("IP={:04}: {}", ip, text);
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until halt, breakpoint, or error.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if !self.exec.is_running() {
            self.running = false;
            self.status = format!("Halted after {} steps", self.exec.steps());
            return;
        }

        let ip = self.exec.instruction_pointer();
        if self.breakpoints.contains(&ip) {
            self.running = false;
            self.status = format!("Breakpoint at IP={}", ip);
            return;
        }

        self.step();
    }

    /// Toggle breakpoint at the current instruction pointer.
    pub fn toggle_breakpoint(&mut self) {
        let ip = self.exec.instruction_pointer();
        if self.breakpoints.remove(&ip) {
            self.status = format!("Removed breakpoint at IP={}", ip);
        } else {
            self.breakpoints.insert(ip);
            self.status = format!("Set breakpoint at IP={}", ip);
        }
    }

    /// Reset to the initial state with the original input.
    pub fn reset(&mut self) {
        self.exec = Self::start(&self.program, &self.input);
        self.running = false;
        self.status = "Reset. Ready.".into();
    }

    /// Disassembly from the instruction pointer forward.
    ///
    /// Decoding backwards is ambiguous in Intcode, so the window always
    /// starts at the current instruction.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(usize, String, bool)> {
        let ip = self.exec.instruction_pointer();
        let words = self.exec.memory().cells();

        let mut listing = Vec::with_capacity(lines);
        let mut addr = ip;
        while listing.len() < lines {
            let (text, width) = disassemble_instruction(words, addr);
            listing.push((addr, text, addr == ip));
            addr += width;
            if addr >= words.len() {
                break;
            }
        }
        listing
    }
}

/// Run the debugger with a program.
pub fn run_debugger(program: Program, input: Vec<BigInt>) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(program, input);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('b') => app.toggle_breakpoint(),
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Up => {
                            app.mem_scroll = app.mem_scroll.saturating_sub(1);
                        }
                        KeyCode::Down => {
                            if app.mem_scroll + 1 < app.exec.memory().len() {
                                app.mem_scroll += 1;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        // Run a batch per frame so long programs finish in reasonable time.
        for _ in 0..256 {
            if !app.running {
                break;
            }
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
