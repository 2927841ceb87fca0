//! WebAssembly bindings for the Intcode VM.
//!
//! Values cross the boundary as decimal strings, since Intcode words are
//! unbounded and JavaScript numbers are not.

use crate::io::{CapturedOutput, Ports, ScriptedInput};
use crate::program::{describe, disassemble, Program};
use crate::vm::{Execution, Pause};
use num_bigint::BigInt;
use wasm_bindgen::prelude::*;

type WasmPorts = Ports<ScriptedInput, CapturedOutput>;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// WebAssembly-friendly VM wrapper.
#[wasm_bindgen]
pub struct WasmVm {
    exec: Execution<WasmPorts>,
    program: Program,
}

#[wasm_bindgen]
impl WasmVm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let program = Program::default();
        Self {
            exec: Self::start(&program),
            program,
        }
    }

    /// Load a program from comma-separated text. Returns its length in words.
    #[wasm_bindgen]
    pub fn load_program(&mut self, text: &str) -> Result<usize, JsError> {
        self.program = text.parse().map_err(js_error)?;
        self.exec = Self::start(&self.program);
        Ok(self.program.len())
    }

    /// Queue an input value, given as a decimal string.
    #[wasm_bindgen]
    pub fn push_input(&mut self, value: &str) -> Result<(), JsError> {
        let value: BigInt = value.trim().parse().map_err(js_error)?;
        self.exec.io_mut().input.push(value);
        Ok(())
    }

    /// Step one instruction. Returns its trace line.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        if self.exec.is_halted() {
            return Err(JsError::new("program has halted"));
        }
        if !self.exec.is_non_blocking() {
            return Err(JsError::new("program is waiting for input"));
        }

        let line = describe(&self.exec);
        self.exec.step().map_err(js_error)?;
        Ok(line)
    }

    /// Run until the program halts, blocks on input, or `max_steps` pass.
    ///
    /// Returns `"halted"`, `"blocked"` or `"limit"`.
    #[wasm_bindgen]
    pub fn run(&mut self, max_steps: u32) -> Result<String, JsError> {
        for _ in 0..max_steps {
            if self.exec.is_halted() {
                return Ok(pause_name(Pause::Halted).into());
            }
            if !self.exec.is_non_blocking() {
                return Ok(pause_name(Pause::AwaitingInput).into());
            }
            self.exec.step().map_err(js_error)?;
        }
        Ok(if self.exec.is_halted() { pause_name(Pause::Halted) } else { "limit" }.into())
    }

    /// Reset to the loaded program, dropping queued input and output.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.exec = Self::start(&self.program);
    }

    /// All output so far, as decimal strings.
    #[wasm_bindgen]
    pub fn outputs(&self) -> js_sys::Array {
        self.exec
            .io()
            .output
            .values()
            .iter()
            .map(|v| JsValue::from_str(&v.to_string()))
            .collect()
    }

    /// Take the output so far, leaving the capture empty.
    #[wasm_bindgen]
    pub fn drain_outputs(&mut self) -> js_sys::Array {
        self.exec
            .io_mut()
            .output
            .drain()
            .into_iter()
            .map(|v| JsValue::from_str(&v.to_string()))
            .collect()
    }

    /// Cell `index`, as a decimal string. Cells past the end read as zero.
    #[wasm_bindgen]
    pub fn memory_at(&self, index: usize) -> String {
        self.exec.memory().read(index).to_string()
    }

    #[wasm_bindgen]
    pub fn memory_len(&self) -> usize {
        self.exec.memory().len()
    }

    #[wasm_bindgen]
    pub fn ip(&self) -> usize {
        self.exec.instruction_pointer()
    }

    #[wasm_bindgen]
    pub fn relative_base(&self) -> String {
        self.exec.relative_base().to_string()
    }

    #[wasm_bindgen]
    pub fn steps(&self) -> u64 {
        self.exec.steps()
    }

    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.exec.state())
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.exec.is_halted()
    }

    /// Machine state as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.exec.snapshot()).map_err(js_error)
    }
}

impl WasmVm {
    fn start(program: &Program) -> Execution<WasmPorts> {
        program.execution(Ports::new(ScriptedInput::empty(), CapturedOutput::new()))
    }
}

impl Default for WasmVm {
    fn default() -> Self {
        Self::new()
    }
}

fn pause_name(pause: Pause) -> &'static str {
    match pause {
        Pause::AwaitingInput => "blocked",
        Pause::Halted => "halted",
    }
}

/// Disassemble a program given as comma-separated text.
#[wasm_bindgen]
pub fn wasm_disassemble(text: &str) -> Result<String, JsError> {
    let program: Program = text.parse().map_err(js_error)?;
    Ok(disassemble(program.words()))
}
