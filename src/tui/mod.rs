//! TUI debugger for Intcode programs.
//!
//! Provides an interactive terminal-based debugger with:
//! - Disassembly from the instruction pointer
//! - Memory view that follows growth past the program image
//! - Step/run/breakpoint controls, pausing when input runs out

mod app;
mod ui;

pub use app::{run_debugger, DebugPorts, DebuggerApp};
