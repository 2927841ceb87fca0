//! # Intcode VM
//!
//! An interpreter for Intcode, a small von-Neumann machine whose programs
//! are lists of integers.
//!
//! Memory holds arbitrary-precision integers and grows on demand. Programs
//! talk to their surroundings through swappable I/O ports, and an execution
//! can pause whenever it waits for input, so a driver can interleave
//! feeding input and reacting to output without threads.

pub mod vm;
pub mod io;
pub mod program;
pub mod devices;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use vm::{
    AddrMode, BlockableExecutor, DecodeError, ExecError, Execution, Instruction, MachineState, Memory,
    MemoryError, Opcode, Pause, Snapshot, DEFAULT_CEILING,
};
pub use io::{CapturedOutput, InputPort, Io, OutputPort, PortError, Ports, ScriptedInput, StdinInput, StdoutOutput};
pub use program::{disassemble, Program, ProgramError};
pub use devices::{Arcade, Robot};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
