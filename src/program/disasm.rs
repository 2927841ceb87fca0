//! Disassembler and execution trace for Intcode programs.
//!
//! Intcode has no separation of code and data, so a listing is only a
//! linear guess: words that do not decode are shown as `DAT`.

use crate::vm::decode::{decode, AddrMode, Instruction, Opcode};
use crate::vm::Execution;
use num_bigint::BigInt;
use num_traits::Zero;

/// Disassemble the instruction at `addr`.
///
/// Returns the text and the number of words consumed.
pub fn disassemble_instruction(words: &[BigInt], addr: usize) -> (String, usize) {
    let word = words.get(addr).cloned().unwrap_or_else(BigInt::zero);
    match decode(&word) {
        Ok(instr) => {
            let operands: Vec<String> = (0..instr.opcode.arity())
                .map(|i| {
                    let raw = words.get(addr + i + 1).cloned().unwrap_or_else(BigInt::zero);
                    format_operand(&raw, instr.mode(i))
                })
                .collect();
            let text = if operands.is_empty() {
                instr.opcode.mnemonic().to_string()
            } else {
                format!("{} {}", instr.opcode.mnemonic(), operands.join(", "))
            };
            (text, instr.opcode.width())
        }
        Err(_) => (format!("DAT {}", word), 1),
    }
}

/// Disassemble a whole memory image.
pub fn disassemble(words: &[BigInt]) -> String {
    let mut output = String::new();
    output.push_str("; Intcode Disassembly\n");
    output.push_str("; -------------------\n\n");

    let mut addr = 0;
    while addr < words.len() {
        let (line, width) = disassemble_instruction(words, addr);
        let end = (addr + width).min(words.len());
        let raw: Vec<String> = words[addr..end].iter().map(|w| w.to_string()).collect();
        output.push_str(&format!("{:04}: {:<28} ; {}\n", addr, line, raw.join(",")));
        addr += width;
    }

    output
}

/// Format an operand with its addressing mode.
fn format_operand(raw: &BigInt, mode: AddrMode) -> String {
    match mode {
        AddrMode::Position => format!("[{}]", raw),
        AddrMode::Immediate => format!("{}", raw),
        AddrMode::Relative => format!("[rb{:+}]", raw),
    }
}

/// One-line trace of the instruction an execution is about to run.
///
/// Shows the instruction pointer, the raw words and the resolved operands,
/// e.g. `[ 0](1002),   4,   3,   4 # [4](33) * !(3) -> [4](33)`.
pub fn describe<D>(execution: &Execution<D>) -> String {
    let ip = execution.instruction_pointer();
    let memory = execution.memory();
    let word = memory.read(ip);
    let header = format!(
        "[{:>2}]({:04}),{:>4},{:>4},{:>4}",
        ip,
        word,
        memory.read(ip + 1),
        memory.read(ip + 2),
        memory.read(ip + 3)
    );

    let instr: Instruction = match decode(&word) {
        Ok(instr) => instr,
        Err(e) => return format!("{} # {}", header, e),
    };
    let ops = execution.operands(instr);
    let arg = |i: usize| ops.describe(i);

    let body = match instr.opcode {
        Opcode::Add => format!("{} + {} -> {}", arg(0), arg(1), arg(2)),
        Opcode::Multiply => format!("{} * {} -> {}", arg(0), arg(1), arg(2)),
        Opcode::Input => format!("input -> {}", arg(0)),
        Opcode::Output => format!("{} -> output", arg(0)),
        Opcode::JumpIfTrue => format!("if {} != 0 jump to {}", arg(0), arg(1)),
        Opcode::JumpIfFalse => format!("if {} == 0 jump to {}", arg(0), arg(1)),
        Opcode::LessThan => format!("{} < {} -> {}", arg(0), arg(1), arg(2)),
        Opcode::Equals => format!("{} == {} -> {}", arg(0), arg(1), arg(2)),
        Opcode::AdjustRelativeBase => {
            format!("!({}) + {} -> relative", execution.relative_base(), arg(0))
        }
        Opcode::Halt => "halt".to_string(),
    };

    format!("{} # {}", header, body)
}
