//! I/O ports connecting a running program to its driver.
//!
//! A program reads from an [`InputPort`] and writes to an [`OutputPort`].
//! The execution engine only talks to an [`Io`] device; [`Ports`] joins an
//! independent input and output into one, while domain objects that both
//! consume output and produce input (the painting robot, for one)
//! implement [`Io`] directly.

mod scripted;
mod standard;

pub use scripted::{CapturedOutput, ScriptedInput};
pub use standard::{StdinInput, StdoutOutput};

use num_bigint::BigInt;
use thiserror::Error;

/// A source of input values.
pub trait InputPort {
    /// Whether a value can be read right now without blocking.
    fn ready(&self) -> bool;

    /// Consume the next value.
    fn read(&mut self) -> Result<BigInt, PortError>;
}

/// A sink for output values.
pub trait OutputPort {
    fn write(&mut self, value: BigInt) -> Result<(), PortError>;
}

/// The device an execution performs I/O against.
pub trait Io {
    fn ready(&self) -> bool;
    fn read(&mut self) -> Result<BigInt, PortError>;
    fn write(&mut self, value: BigInt) -> Result<(), PortError>;
}

/// An input port and an output port wired together.
#[derive(Debug, Clone, Default)]
pub struct Ports<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Ports<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Swap in a new input port, returning the old one.
    pub fn replace_input(&mut self, input: I) -> I {
        std::mem::replace(&mut self.input, input)
    }
}

impl<I: InputPort, O: OutputPort> Io for Ports<I, O> {
    fn ready(&self) -> bool {
        self.input.ready()
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        self.input.read()
    }

    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        self.output.write(value)
    }
}

impl<T: Io + ?Sized> Io for &mut T {
    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        (**self).read()
    }

    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        (**self).write(value)
    }
}

impl<T: InputPort + ?Sized> InputPort for &mut T {
    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        (**self).read()
    }
}

impl<T: OutputPort + ?Sized> OutputPort for &mut T {
    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        (**self).write(value)
    }
}

/// Errors raised by ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// A scripted input was read after its last value.
    #[error("input exhausted")]
    InputExhausted,

    /// Interactive input could not be parsed as an integer.
    #[error("invalid input: {0:?}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// A device received a value it has no meaning for.
    #[error("unexpected output {value}: {reason}")]
    UnexpectedOutput { value: BigInt, reason: String },
}

impl From<std::io::Error> for PortError {
    fn from(e: std::io::Error) -> Self {
        PortError::Io(e.to_string())
    }
}
