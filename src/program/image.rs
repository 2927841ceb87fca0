//! Program images.
//!
//! Intcode programs are plain text: signed decimal integers separated by
//! commas, with optional whitespace and a trailing newline. Word `n` of the
//! text is loaded at address `n`.

use crate::io::Io;
use crate::vm::{BlockableExecutor, ExecError, Execution, Memory, MemoryError};
use num_bigint::BigInt;
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// A parsed, immutable program image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    words: Vec<BigInt>,
}

impl Program {
    pub fn new(words: Vec<BigInt>) -> Self {
        Self { words }
    }

    /// Load a program from a text file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProgramError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProgramError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        text.parse()
    }

    /// Save the program as comma-separated text.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProgramError> {
        std::fs::write(path.as_ref(), format!("{}\n", self))
            .map_err(|e| ProgramError::Io(format!("{}: {}", path.as_ref().display(), e)))
    }

    pub fn words(&self) -> &[BigInt] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// A copy of this program with word `index` replaced.
    ///
    /// Drivers use this to set up inputs stored in the image itself, e.g. a
    /// noun and verb in cells 1 and 2, or free play in cell 0.
    pub fn with_patch(&self, index: usize, value: impl Into<BigInt>) -> Result<Self, MemoryError> {
        let mut memory = self.memory();
        memory.write(index, value.into())?;
        Ok(Self::new(memory.cells().to_vec()))
    }

    /// Fresh memory holding the program.
    pub fn memory(&self) -> Memory {
        Memory::from_cells(self.words.clone())
    }

    /// Start an execution of this program against `io`.
    pub fn execution<D>(&self, io: D) -> Execution<D> {
        Execution::new(self.memory(), io)
    }

    /// Run to completion and return the final memory.
    pub fn run<D: Io>(&self, io: D) -> Result<Memory, ExecError> {
        let mut execution = self.execution(io);
        execution.run_to_completion()?;
        Ok(execution.into_parts().0)
    }

    /// An executor that pauses whenever the program waits for input.
    pub fn blockable_executor<D: Io>(&self, io: D) -> BlockableExecutor<D> {
        BlockableExecutor::new(self.execution(io))
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ProgramError::Empty);
        }

        let words = text
            .split(',')
            .enumerate()
            .map(|(position, token)| {
                let token = token.trim();
                token.parse::<BigInt>().map_err(|_| ProgramError::Parse {
                    position,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { words })
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", word)?;
        }
        Ok(())
    }
}

impl From<Vec<i64>> for Program {
    fn from(words: Vec<i64>) -> Self {
        Self::new(words.into_iter().map(BigInt::from).collect())
    }
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("program is empty")]
    Empty,

    #[error("word {position} is not an integer: {token:?}")]
    Parse { position: usize, token: String },
}
