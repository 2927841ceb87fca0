//! Instruction decoder for Intcode.
//!
//! An instruction word packs a two-digit opcode in its low decimal digits;
//! each further digit, from least to most significant, selects the
//! addressing mode of operand 1, 2 and 3.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Maximum number of operands any instruction takes.
pub const MAX_OPERANDS: usize = 3;

/// Operand addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AddrMode {
    /// Operand is an address (mode 0)
    #[default]
    Position,
    /// Operand is a literal value (mode 1)
    Immediate,
    /// Operand is an offset from the relative base (mode 2)
    Relative,
}

impl AddrMode {
    /// Create from a mode digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(AddrMode::Position),
            1 => Some(AddrMode::Immediate),
            2 => Some(AddrMode::Relative),
            _ => None,
        }
    }

    /// Convert to a mode digit.
    pub fn to_digit(self) -> u8 {
        match self {
            AddrMode::Position => 0,
            AddrMode::Immediate => 1,
            AddrMode::Relative => 2,
        }
    }
}

/// The ten Intcode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// `dest := a + b`
    Add,
    /// `dest := a * b`
    Multiply,
    /// `dest := input`
    Input,
    /// `output := a`
    Output,
    /// `if a != 0 then ip := target`
    JumpIfTrue,
    /// `if a == 0 then ip := target`
    JumpIfFalse,
    /// `dest := a < b`
    LessThan,
    /// `dest := a == b`
    Equals,
    /// `relative_base += a`
    AdjustRelativeBase,
    /// Stop execution
    Halt,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Multiply,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    /// Look up an opcode by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        let opcode = match code {
            1 => Opcode::Add,
            2 => Opcode::Multiply,
            3 => Opcode::Input,
            4 => Opcode::Output,
            5 => Opcode::JumpIfTrue,
            6 => Opcode::JumpIfFalse,
            7 => Opcode::LessThan,
            8 => Opcode::Equals,
            9 => Opcode::AdjustRelativeBase,
            99 => Opcode::Halt,
            _ => return None,
        };
        Some(opcode)
    }

    /// The numeric code of this opcode.
    pub fn code(self) -> u8 {
        match self {
            Opcode::Add => 1,
            Opcode::Multiply => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustRelativeBase => 9,
            Opcode::Halt => 99,
        }
    }

    /// Number of operand words following the instruction word.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// Instruction length in words, including the instruction word.
    pub fn width(self) -> usize {
        1 + self.arity()
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Multiply => "MUL",
            Opcode::Input => "IN",
            Opcode::Output => "OUT",
            Opcode::JumpIfTrue => "JNZ",
            Opcode::JumpIfFalse => "JZ",
            Opcode::LessThan => "LT",
            Opcode::Equals => "EQ",
            Opcode::AdjustRelativeBase => "ARB",
            Opcode::Halt => "HLT",
        }
    }
}

/// Decoded Intcode instruction.
///
/// Modes past the opcode's arity are always [`AddrMode::Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub modes: [AddrMode; MAX_OPERANDS],
}

impl Instruction {
    /// An instruction with every operand in position mode.
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            modes: [AddrMode::Position; MAX_OPERANDS],
        }
    }

    /// Builder-style mode override for operand `index`.
    pub fn with_mode(mut self, index: usize, mode: AddrMode) -> Self {
        self.modes[index] = mode;
        self
    }

    /// Mode of operand `index` (0-based).
    pub fn mode(&self, index: usize) -> AddrMode {
        self.modes[index]
    }
}

/// Decode an instruction word.
///
/// Only the mode digits of operands the opcode actually takes are checked;
/// higher digits are ignored.
pub fn decode(word: &BigInt) -> Result<Instruction, DecodeError> {
    let raw = word
        .to_u64()
        .ok_or_else(|| DecodeError::InvalidWord(word.clone()))?;

    let code = (raw % 100) as u8;
    let opcode = Opcode::from_code(code).ok_or(DecodeError::UnknownOpcode {
        opcode: code,
        word: raw,
    })?;

    let mut instruction = Instruction::new(opcode);
    let mut digits = raw / 100;
    for operand in 0..opcode.arity() {
        let digit = (digits % 10) as u8;
        instruction.modes[operand] = AddrMode::from_digit(digit).ok_or(DecodeError::UnknownMode {
            mode: digit,
            operand,
            word: raw,
        })?;
        digits /= 10;
    }

    Ok(instruction)
}

/// Peek at the opcode of a word without validating its modes.
pub fn opcode_of(word: &BigInt) -> Option<Opcode> {
    word.to_u64().and_then(|raw| Opcode::from_code((raw % 100) as u8))
}

/// Encode an instruction back to its word.
pub fn encode(instr: &Instruction) -> BigInt {
    let mut word = 0u64;
    for operand in (0..instr.opcode.arity()).rev() {
        word = word * 10 + instr.modes[operand].to_digit() as u64;
    }
    BigInt::from(word * 100 + instr.opcode.code() as u64)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid instruction word: {0}")]
    InvalidWord(BigInt),

    #[error("unknown opcode {opcode} in instruction {word}")]
    UnknownOpcode { opcode: u8, word: u64 },

    #[error("unknown addressing mode {mode} for operand {operand} in instruction {word}")]
    UnknownMode { mode: u8, operand: usize, word: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_halt() {
        let instr = decode(&BigInt::from(99)).unwrap();
        assert_eq!(instr, Instruction::new(Opcode::Halt));
    }

    #[test]
    fn test_decode_modes() {
        let instr = decode(&BigInt::from(1002)).unwrap();
        assert_eq!(instr.opcode, Opcode::Multiply);
        assert_eq!(instr.modes, [AddrMode::Position, AddrMode::Immediate, AddrMode::Position]);

        let instr = decode(&BigInt::from(21101)).unwrap();
        assert_eq!(instr.opcode, Opcode::Add);
        assert_eq!(instr.modes, [AddrMode::Immediate, AddrMode::Immediate, AddrMode::Relative]);

        let instr = decode(&BigInt::from(204)).unwrap();
        assert_eq!(instr.opcode, Opcode::Output);
        assert_eq!(instr.mode(0), AddrMode::Relative);
    }

    #[test]
    fn test_addr_mode_roundtrip() {
        for mode in [AddrMode::Position, AddrMode::Immediate, AddrMode::Relative] {
            assert_eq!(AddrMode::from_digit(mode.to_digit()), Some(mode));
        }
        assert_eq!(AddrMode::from_digit(3), None);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            decode(&BigInt::from(1042)),
            Err(DecodeError::UnknownOpcode { opcode: 42, word: 1042 })
        );
        assert_eq!(
            decode(&BigInt::from(0)),
            Err(DecodeError::UnknownOpcode { opcode: 0, word: 0 })
        );
    }

    #[test]
    fn test_unknown_mode() {
        assert_eq!(
            decode(&BigInt::from(3001)),
            Err(DecodeError::UnknownMode { mode: 3, operand: 1, word: 3001 })
        );
    }

    #[test]
    fn test_negative_word_rejected() {
        assert!(matches!(decode(&BigInt::from(-1)), Err(DecodeError::InvalidWord(_))));
    }

    #[test]
    fn test_digits_beyond_arity_are_ignored() {
        // Output takes one operand; the 9 in the hundreds-of-operand-2 slot is never read.
        let instr = decode(&BigInt::from(9104)).unwrap();
        assert_eq!(instr, Instruction::new(Opcode::Output).with_mode(0, AddrMode::Immediate));
    }

    #[test]
    fn test_arity_matches_width() {
        for op in Opcode::ALL {
            assert_eq!(op.width(), op.arity() + 1);
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
    }

    fn any_mode() -> impl Strategy<Value = AddrMode> {
        prop_oneof![
            Just(AddrMode::Position),
            Just(AddrMode::Immediate),
            Just(AddrMode::Relative),
        ]
    }

    proptest! {
        #[test]
        fn prop_encode_decode(op_index in 0usize..10, modes in proptest::array::uniform3(any_mode())) {
            let opcode = Opcode::ALL[op_index];
            let mut instr = Instruction::new(opcode);
            for i in 0..opcode.arity() {
                instr.modes[i] = modes[i];
            }

            prop_assert_eq!(decode(&encode(&instr)), Ok(instr));
        }
    }
}
