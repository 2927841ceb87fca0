//! Intcode memory subsystem.
//!
//! Memory is a dense, growable sequence of arbitrary-precision cells.
//! Reads past the end yield zero and writes past the end zero-fill every
//! cell in between, so programs can treat memory as unbounded. A ceiling
//! on the highest address keeps runaway relative-base arithmetic from
//! allocating without limit.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Default highest addressable cell (exclusive).
pub const DEFAULT_CEILING: usize = 1 << 20;

/// Intcode memory: owned cells plus an address ceiling.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<BigInt>,
    ceiling: usize,
}

impl Memory {
    /// Create an empty memory with the default ceiling.
    pub fn new() -> Self {
        Self::with_ceiling(DEFAULT_CEILING)
    }

    /// Create an empty memory that rejects addresses at or above `ceiling`.
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self {
            cells: Vec::new(),
            ceiling,
        }
    }

    /// Create a memory holding `cells`, starting at address 0.
    pub fn from_cells(cells: Vec<BigInt>) -> Self {
        let ceiling = DEFAULT_CEILING.max(cells.len());
        Self { cells, ceiling }
    }

    /// Replace the address ceiling. Cells already stored are kept.
    pub fn set_ceiling(&mut self, ceiling: usize) {
        self.ceiling = ceiling.max(self.cells.len());
    }

    /// The highest addressable cell (exclusive).
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Number of cells currently allocated.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All allocated cells, in address order.
    pub fn cells(&self) -> &[BigInt] {
        &self.cells
    }

    /// Convert a program-supplied value into a checked address.
    pub fn address(&self, index: &BigInt) -> Result<usize, MemoryError> {
        if index.sign() == num_bigint::Sign::Minus {
            return Err(MemoryError::NegativeAddress(index.clone()));
        }
        match index.to_usize() {
            Some(address) if address < self.ceiling => Ok(address),
            _ => Err(MemoryError::AddressOutOfRange {
                address: index.clone(),
                ceiling: self.ceiling,
            }),
        }
    }

    /// Read a cell by value-typed address.
    pub fn get(&self, index: &BigInt) -> Result<BigInt, MemoryError> {
        let address = self.address(index)?;
        Ok(self.read(address))
    }

    /// Write a cell by value-typed address, growing memory as needed.
    pub fn set(&mut self, index: &BigInt, value: BigInt) -> Result<(), MemoryError> {
        let address = self.address(index)?;
        self.write(address, value)
    }

    /// Read a cell by index. Unallocated cells read as zero.
    #[inline]
    pub fn read(&self, address: usize) -> BigInt {
        self.cells.get(address).cloned().unwrap_or_else(BigInt::zero)
    }

    /// Write a cell by index, zero-filling any gap after the current end.
    pub fn write(&mut self, address: usize, value: BigInt) -> Result<(), MemoryError> {
        if address >= self.ceiling {
            return Err(MemoryError::AddressOutOfRange {
                address: BigInt::from(address),
                ceiling: self.ceiling,
            });
        }
        if address >= self.cells.len() {
            self.cells.resize(address + 1, BigInt::zero());
        }
        self.cells[address] = value;
        Ok(())
    }

    /// Dump memory contents (for debugging).
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, BigInt)> {
        let end = start.saturating_add(count).min(self.cells.len());
        (start.min(end)..end)
            .map(|i| (i, self.cells[i].clone()))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|cell| !cell.is_zero()).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("allocated_cells", &self.cells.len())
            .field("ceiling", &self.ceiling)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A program computed a negative address.
    #[error("negative memory address {0}")]
    NegativeAddress(BigInt),

    /// Address is at or above the memory ceiling.
    #[error("memory address {address} out of range (ceiling {ceiling})")]
    AddressOutOfRange { address: BigInt, ceiling: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_past_end_is_zero() {
        let mem = Memory::from_cells(vec![BigInt::from(7)]);

        assert_eq!(mem.read(0), BigInt::from(7));
        assert_eq!(mem.read(500), BigInt::zero());
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn test_write_zero_fills_gap() {
        let mut mem = Memory::from_cells(vec![BigInt::from(1), BigInt::from(2)]);
        mem.write(5, BigInt::from(9)).unwrap();

        assert_eq!(mem.len(), 6);
        assert_eq!(mem.cells()[2..5], [BigInt::zero(), BigInt::zero(), BigInt::zero()]);
        assert_eq!(mem.read(5), BigInt::from(9));
    }

    #[test]
    fn test_negative_address_rejected() {
        let mem = Memory::new();
        let err = mem.get(&BigInt::from(-1)).unwrap_err();

        assert_eq!(err, MemoryError::NegativeAddress(BigInt::from(-1)));
    }

    #[test]
    fn test_ceiling_rejected() {
        let mut mem = Memory::with_ceiling(16);

        assert!(mem.set(&BigInt::from(15), BigInt::from(1)).is_ok());
        assert!(matches!(
            mem.set(&BigInt::from(16), BigInt::from(1)),
            Err(MemoryError::AddressOutOfRange { ceiling: 16, .. })
        ));
        // A huge address never allocates.
        let huge: BigInt = BigInt::from(u64::MAX) * 1000;
        assert!(mem.get(&huge).is_err());
        assert_eq!(mem.len(), 16);
    }

    #[test]
    fn test_ceiling_never_below_loaded_program() {
        let mut mem = Memory::from_cells(vec![BigInt::zero(); 8]);
        mem.set_ceiling(4);

        assert_eq!(mem.ceiling(), 8);
    }

    #[test]
    fn test_dump_clamps_range() {
        let mem = Memory::from_cells((0..4).map(BigInt::from).collect());
        let dump = mem.dump(2, 10);

        assert_eq!(dump, vec![(2, BigInt::from(2)), (3, BigInt::from(3))]);
        assert!(mem.dump(10, 3).is_empty());
    }

    proptest! {
        #[test]
        fn prop_write_then_read(address in 0usize..4096, value in any::<i64>()) {
            let mut mem = Memory::new();
            mem.write(address, BigInt::from(value)).unwrap();

            prop_assert_eq!(mem.read(address), BigInt::from(value));
            prop_assert_eq!(mem.len(), address + 1);
            for i in 0..address {
                prop_assert!(mem.read(i).is_zero());
            }
        }
    }
}
