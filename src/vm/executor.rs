//! Cooperative execution around input availability.
//!
//! A [`BlockableExecutor`] runs a program until it halts or is about to
//! read input that is not there yet, then hands control back. The driver
//! reacts to whatever was written, supplies more input, and resumes. No
//! threads are involved.

use crate::io::{InputPort, Io, OutputPort, Ports};
use crate::vm::execute::{ExecError, Execution};

/// Why [`BlockableExecutor::execute_until_block`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The next instruction reads input that is not ready.
    AwaitingInput,
    /// The program halted.
    Halted,
}

pub struct BlockableExecutor<D> {
    execution: Execution<D>,
}

impl<D: Io> BlockableExecutor<D> {
    pub fn new(execution: Execution<D>) -> Self {
        Self { execution }
    }

    /// Step while the next instruction would not block and the program has
    /// not halted. Returns the device so the driver can drain output.
    pub fn execute_until_block(&mut self) -> Result<&mut D, ExecError> {
        self.resume()?;
        Ok(self.execution.io_mut())
    }

    /// Like [`execute_until_block`](Self::execute_until_block), reporting why
    /// execution stopped instead of handing back the device.
    pub fn resume(&mut self) -> Result<Pause, ExecError> {
        while self.execution.is_running() && self.execution.is_non_blocking() {
            self.execution.step()?;
        }

        if self.execution.is_halted() {
            Ok(Pause::Halted)
        } else {
            log::debug!("blocked on input at ip {}", self.execution.instruction_pointer());
            Ok(Pause::AwaitingInput)
        }
    }

    pub fn is_halted(&self) -> bool {
        self.execution.is_halted()
    }

    pub fn execution(&self) -> &Execution<D> {
        &self.execution
    }

    pub fn execution_mut(&mut self) -> &mut Execution<D> {
        &mut self.execution
    }

    pub fn io(&self) -> &D {
        self.execution.io()
    }

    pub fn io_mut(&mut self) -> &mut D {
        self.execution.io_mut()
    }

    pub fn into_execution(self) -> Execution<D> {
        self.execution
    }
}

impl<I: InputPort, O: OutputPort> BlockableExecutor<Ports<I, O>> {
    /// Swap in `input`, then run until the next block. Returns the output
    /// port shared across every resumption.
    pub fn execute_until_block_with(&mut self, input: I) -> Result<&mut O, ExecError> {
        self.execution.io_mut().replace_input(input);
        let ports = self.execute_until_block()?;
        Ok(&mut ports.output)
    }

    pub fn output(&self) -> &O {
        &self.execution.io().output
    }
}

impl<D> std::fmt::Debug for BlockableExecutor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockableExecutor")
            .field("execution", &self.execution)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{CapturedOutput, ScriptedInput};
    use crate::vm::Memory;
    use num_bigint::BigInt;

    fn executor(words: &[i64]) -> BlockableExecutor<Ports<ScriptedInput, CapturedOutput>> {
        let memory = Memory::from_cells(words.iter().copied().map(BigInt::from).collect());
        BlockableExecutor::new(Execution::new(
            memory,
            Ports::new(ScriptedInput::empty(), CapturedOutput::new()),
        ))
    }

    #[test]
    fn test_blocks_without_consuming() {
        // OUT 1, IN -> [0], OUT [0], HLT
        let mut exec = executor(&[104, 1, 3, 0, 4, 0, 99]);

        let output = exec.execute_until_block().unwrap();
        assert_eq!(output.output.values(), &[BigInt::from(1)]);
        assert!(!exec.is_halted());
        assert!(!exec.execution().is_non_blocking());
        assert_eq!(exec.execution().instruction_pointer(), 2);

        // Resuming without new input stays put.
        assert_eq!(exec.resume().unwrap(), Pause::AwaitingInput);
        assert_eq!(exec.execution().instruction_pointer(), 2);

        let output = exec.execute_until_block_with(ScriptedInput::new([55])).unwrap();
        assert_eq!(output.values(), &[BigInt::from(1), BigInt::from(55)]);
        assert!(exec.is_halted());
    }

    #[test]
    fn test_interleaves_multiple_inputs() {
        // Loop forever: IN -> [100], MUL [100] * 2 -> [100], OUT [100], JMP 0
        let mut exec = executor(&[3, 100, 1002, 100, 2, 100, 4, 100, 1105, 1, 0]);

        for value in 1..=5 {
            let output = exec.execute_until_block_with(ScriptedInput::new([value])).unwrap();
            assert_eq!(output.drain(), vec![BigInt::from(value * 2)]);
        }
        assert!(!exec.is_halted());
        assert_eq!(exec.execution().instruction_pointer(), 0);
    }

    #[test]
    fn test_halt_reported() {
        let mut exec = executor(&[104, 7, 99]);

        assert_eq!(exec.resume().unwrap(), Pause::Halted);
        assert!(exec.is_halted());
        assert_eq!(exec.output().values(), &[BigInt::from(7)]);
    }

    #[test]
    fn test_errors_propagate() {
        let mut exec = executor(&[104, 7, 77]);
        assert!(exec.execute_until_block().is_err());
    }
}
