//! Loading and inspecting Intcode programs.
//!
//! This module provides:
//! - [`Program`], a parsed program image (comma-separated integers)
//! - A disassembler and a one-line execution trace

pub mod image;
pub mod disasm;

pub use image::{Program, ProgramError};
pub use disasm::{describe, disassemble, disassemble_instruction};
