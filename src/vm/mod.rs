//! The Intcode virtual machine.
//!
//! - Memory of arbitrary-precision cells that grows on demand
//! - Ten opcodes with position, immediate and relative addressing
//! - An execution engine that can pause whenever input is not ready

pub mod memory;
pub mod decode;
pub mod operand;
pub mod execute;
pub mod executor;

pub use memory::{Memory, MemoryError, DEFAULT_CEILING};
pub use decode::{AddrMode, DecodeError, Instruction, Opcode};
pub use operand::Operands;
pub use execute::{ExecError, Execution, MachineState, Snapshot};
pub use executor::{BlockableExecutor, Pause};
