//! Operand resolution.
//!
//! Operand `i` of the instruction at `ip` lives in word `ip + i + 1`. How
//! that word is interpreted depends on the operand's addressing mode.

use crate::vm::decode::{AddrMode, Instruction};
use crate::vm::memory::{Memory, MemoryError};
use num_bigint::BigInt;

/// Resolves the operands of one instruction against a memory snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Operands<'a> {
    memory: &'a Memory,
    ip: usize,
    relative_base: &'a BigInt,
    instruction: Instruction,
}

impl<'a> Operands<'a> {
    pub fn new(memory: &'a Memory, ip: usize, relative_base: &'a BigInt, instruction: Instruction) -> Self {
        Self {
            memory,
            ip,
            relative_base,
            instruction,
        }
    }

    /// The raw word stored in operand slot `index`.
    pub fn raw(&self, index: usize) -> BigInt {
        self.memory.read(self.ip + index + 1)
    }

    /// The value of operand `index`.
    pub fn value(&self, index: usize) -> Result<BigInt, MemoryError> {
        let raw = self.raw(index);
        match self.instruction.mode(index) {
            AddrMode::Position => self.memory.get(&raw),
            AddrMode::Immediate => Ok(raw),
            AddrMode::Relative => self.memory.get(&(self.relative_base + raw)),
        }
    }

    /// The address operand `index` names as a write destination.
    ///
    /// Immediate mode is treated like position mode; no instruction writes
    /// through an immediate operand.
    pub fn target(&self, index: usize) -> BigInt {
        let raw = self.raw(index);
        match self.instruction.mode(index) {
            AddrMode::Position | AddrMode::Immediate => raw,
            AddrMode::Relative => self.relative_base + raw,
        }
    }

    /// Render operand `index` for traces.
    ///
    /// Position `[a](v)`, immediate `!(v)`, relative `[rb + off](v)`; a value
    /// that cannot be read shows as `?`.
    pub fn describe(&self, index: usize) -> String {
        let raw = self.raw(index);
        let value = self
            .value(index)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string());
        match self.instruction.mode(index) {
            AddrMode::Position => format!("[{}]({})", raw, value),
            AddrMode::Immediate => format!("!({})", value),
            AddrMode::Relative => format!("[{} + {}]({})", self.relative_base, raw, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::decode::decode;

    fn memory(words: &[i64]) -> Memory {
        Memory::from_cells(words.iter().copied().map(BigInt::from).collect())
    }

    #[test]
    fn test_value_by_mode() {
        // 2001 = ADD position, relative
        let mem = memory(&[2001, 4, -1, 2, 55]);
        let rb = BigInt::from(3);
        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(2001)).unwrap());

        // position: mem[4]
        assert_eq!(ops.value(0).unwrap(), BigInt::from(55));
        // relative: mem[3 - 1]
        assert_eq!(ops.value(1).unwrap(), BigInt::from(-1));

        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(1001)).unwrap());
        assert_eq!(ops.value(1).unwrap(), BigInt::from(-1));

        let rb = BigInt::from(30);
        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(2001)).unwrap());
        // relative: mem[29] is past the end
        assert_eq!(ops.value(1).unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_target_ignores_immediate() {
        let mem = memory(&[21101, 1, 1, 6]);
        let rb = BigInt::from(10);
        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(21101)).unwrap());
        assert_eq!(ops.target(2), BigInt::from(16));

        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(11101)).unwrap());
        assert_eq!(ops.target(2), BigInt::from(6));
    }

    #[test]
    fn test_negative_relative_address_fails() {
        let mem = memory(&[204, -5]);
        let rb = BigInt::from(2);
        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(204)).unwrap());

        assert!(matches!(ops.value(0), Err(MemoryError::NegativeAddress(_))));
        assert_eq!(ops.describe(0), "[2 + -5](?)");
    }

    #[test]
    fn test_describe() {
        let mem = memory(&[1001, 4, 3, 4, 33]);
        let rb = BigInt::from(0);
        let ops = Operands::new(&mem, 0, &rb, decode(&BigInt::from(1001)).unwrap());

        assert_eq!(ops.describe(0), "[4](33)");
        assert_eq!(ops.describe(1), "!(3)");
    }
}
