//! Execution engine for Intcode.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::io::{Io, PortError};
use crate::vm::decode::{self, DecodeError, Instruction, Opcode};
use crate::vm::memory::{Memory, MemoryError};
use crate::vm::operand::Operands;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Machine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineState {
    /// More instructions to perform.
    Running,
    /// Opcode 99 reached.
    Halted,
}

/// A program in flight: memory, instruction pointer, relative base and the
/// device it performs I/O against.
pub struct Execution<D> {
    memory: Memory,
    ip: usize,
    relative_base: BigInt,
    state: MachineState,
    steps: u64,
    io: D,
}

impl<D> Execution<D> {
    /// Start executing `memory` at address 0 with relative base 0.
    pub fn new(memory: Memory, io: D) -> Self {
        Self {
            memory,
            ip: 0,
            relative_base: BigInt::zero(),
            state: MachineState::Running,
            steps: 0,
            io,
        }
    }

    /// Resume from a captured snapshot.
    pub fn restore(snapshot: Snapshot, io: D) -> Self {
        Self {
            memory: snapshot.memory,
            ip: snapshot.instruction_pointer,
            relative_base: snapshot.relative_base,
            state: snapshot.state,
            steps: snapshot.steps,
            io,
        }
    }

    /// Capture everything but the I/O device.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.memory.clone(),
            instruction_pointer: self.ip,
            relative_base: self.relative_base.clone(),
            state: self.state,
            steps: self.steps,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    pub fn relative_base(&self) -> &BigInt {
        &self.relative_base
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn io(&self) -> &D {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut D {
        &mut self.io
    }

    /// Replace the I/O device, returning the old one.
    pub fn replace_io(&mut self, io: D) -> D {
        std::mem::replace(&mut self.io, io)
    }

    pub fn into_parts(self) -> (Memory, D) {
        (self.memory, self.io)
    }

    pub fn is_halted(&self) -> bool {
        self.state == MachineState::Halted
    }

    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }

    /// Decode the instruction at the instruction pointer.
    pub fn current_instruction(&self) -> Result<Instruction, DecodeError> {
        decode::decode(&self.memory.read(self.ip))
    }

    /// Operand resolver for the instruction at the instruction pointer.
    pub fn operands(&self, instruction: Instruction) -> Operands<'_> {
        Operands::new(&self.memory, self.ip, &self.relative_base, instruction)
    }
}

impl<D: Io> Execution<D> {
    /// Whether the next step can run without waiting for input.
    ///
    /// Only an input instruction whose device is not ready blocks; a word
    /// that fails to decode is left for [`Execution::step`] to report.
    pub fn is_non_blocking(&self) -> bool {
        match decode::opcode_of(&self.memory.read(self.ip)) {
            Some(Opcode::Input) => self.io.ready(),
            _ => true,
        }
    }

    /// Execute a single instruction.
    ///
    /// Returns the opcode that was executed. Stepping a halted machine is a
    /// no-op that reports [`Opcode::Halt`].
    pub fn step(&mut self) -> Result<Opcode, ExecError> {
        if self.is_halted() {
            return Ok(Opcode::Halt);
        }

        // Fetch + decode
        let instr = self.current_instruction()?;

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", crate::program::disasm::describe(self));
        }

        // Execute
        self.execute(instr)?;
        self.steps += 1;

        Ok(instr.opcode)
    }

    /// Step until halted. Returns the final memory.
    pub fn run_to_completion(&mut self) -> Result<&Memory, ExecError> {
        while self.is_running() {
            self.step()?;
        }
        Ok(&self.memory)
    }

    /// Run for at most `max_steps` instructions.
    ///
    /// Returns the number of instructions executed.
    pub fn run_limited(&mut self, max_steps: u64) -> Result<u64, ExecError> {
        let start = self.steps;
        let limit = self.steps.saturating_add(max_steps);

        while self.is_running() && self.steps < limit {
            self.step()?;
        }

        if self.is_running() {
            log::warn!("stopped after {} steps at ip {}", max_steps, self.ip);
        }
        Ok(self.steps - start)
    }

    /// Execute a decoded instruction.
    ///
    /// Every operand is resolved before memory is written, so an instruction
    /// never observes its own write.
    fn execute(&mut self, instr: Instruction) -> Result<(), ExecError> {
        let ops = self.operands(instr);

        match instr.opcode {
            Opcode::Add => {
                let (a, b, dest) = (ops.value(0)?, ops.value(1)?, ops.target(2));
                self.store(&dest, a + b)?;
            }

            Opcode::Multiply => {
                let (a, b, dest) = (ops.value(0)?, ops.value(1)?, ops.target(2));
                self.store(&dest, a * b)?;
            }

            Opcode::Input => {
                let dest = ops.target(0);
                let value = self.io.read()?;
                self.store(&dest, value)?;
            }

            Opcode::Output => {
                let value = ops.value(0)?;
                self.io.write(value)?;
            }

            Opcode::JumpIfTrue => {
                let (cond, target) = (ops.value(0)?, ops.value(1)?);
                if !cond.is_zero() {
                    return self.jump(target);
                }
            }

            Opcode::JumpIfFalse => {
                let (cond, target) = (ops.value(0)?, ops.value(1)?);
                if cond.is_zero() {
                    return self.jump(target);
                }
            }

            Opcode::LessThan => {
                let (a, b, dest) = (ops.value(0)?, ops.value(1)?, ops.target(2));
                self.store(&dest, flag(a < b))?;
            }

            Opcode::Equals => {
                let (a, b, dest) = (ops.value(0)?, ops.value(1)?, ops.target(2));
                self.store(&dest, flag(a == b))?;
            }

            Opcode::AdjustRelativeBase => {
                let offset = ops.value(0)?;
                self.relative_base += offset;
                log::debug!("relative base now {}", self.relative_base);
            }

            Opcode::Halt => {
                self.state = MachineState::Halted;
                log::debug!("halted at ip {} after {} steps", self.ip, self.steps + 1);
                return Ok(());
            }
        }

        self.ip += instr.opcode.width();
        Ok(())
    }

    fn store(&mut self, dest: &BigInt, value: BigInt) -> Result<(), ExecError> {
        self.memory.set(dest, value)?;
        Ok(())
    }

    fn jump(&mut self, target: BigInt) -> Result<(), ExecError> {
        self.ip = target
            .to_usize()
            .filter(|&ip| ip < self.memory.ceiling())
            .ok_or(ExecError::InvalidJumpTarget(target))?;
        Ok(())
    }
}

fn flag(condition: bool) -> BigInt {
    if condition {
        BigInt::one()
    } else {
        BigInt::zero()
    }
}

impl<D> std::fmt::Debug for Execution<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Execution")
            .field("state", &self.state)
            .field("ip", &self.ip)
            .field("relative_base", &self.relative_base)
            .field("steps", &self.steps)
            .field("memory", &self.memory)
            .finish()
    }
}

/// Machine state without its I/O device, for callers that want to save and
/// resume an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub memory: Memory,
    pub instruction_pointer: usize,
    pub relative_base: BigInt,
    pub state: MachineState,
    pub steps: u64,
}

/// Errors that can occur during execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("memory error: {0}")]
    MemoryError(#[from] MemoryError),

    #[error("malformed program: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("port error: {0}")]
    PortError(#[from] PortError),

    #[error("invalid jump target {0}")]
    InvalidJumpTarget(BigInt),
}
