//! In-memory ports: predetermined input and captured output.

use super::{InputPort, OutputPort, PortError};
use num_bigint::BigInt;
use std::collections::VecDeque;

/// Input backed by a finite sequence of values.
///
/// `ready` holds until the sequence is exhausted; reading past the end is
/// [`PortError::InputExhausted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedInput {
    values: VecDeque<BigInt>,
}

impl ScriptedInput {
    pub fn new<T: Into<BigInt>>(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// An input with nothing to read.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Queue another value behind the remaining ones.
    pub fn push(&mut self, value: impl Into<BigInt>) {
        self.values.push_back(value.into());
    }

    /// Values not yet read.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl InputPort for ScriptedInput {
    fn ready(&self) -> bool {
        !self.values.is_empty()
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        self.values.pop_front().ok_or(PortError::InputExhausted)
    }
}

/// Output that records every value in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    values: Vec<BigInt>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[BigInt] {
        &self.values
    }

    /// Most recent value written, if any.
    pub fn last(&self) -> Option<&BigInt> {
        self.values.last()
    }

    /// Take every captured value, leaving the capture empty.
    pub fn drain(&mut self) -> Vec<BigInt> {
        std::mem::take(&mut self.values)
    }

    pub fn into_values(self) -> Vec<BigInt> {
        self.values
    }
}

impl OutputPort for CapturedOutput {
    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        self.values.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_exhausts() {
        let mut input = ScriptedInput::new([5, -3]);

        assert!(input.ready());
        assert_eq!(input.read(), Ok(BigInt::from(5)));
        assert_eq!(input.read(), Ok(BigInt::from(-3)));
        assert!(!input.ready());
        assert_eq!(input.read(), Err(PortError::InputExhausted));
    }

    #[test]
    fn test_scripted_input_push() {
        let mut input = ScriptedInput::empty();
        assert!(!input.ready());

        input.push(1);
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read(), Ok(BigInt::from(1)));
    }

    #[test]
    fn test_captured_output_drain() {
        let mut output = CapturedOutput::new();
        output.write(BigInt::from(1)).unwrap();
        output.write(BigInt::from(2)).unwrap();

        assert_eq!(output.last(), Some(&BigInt::from(2)));
        assert_eq!(output.drain(), vec![BigInt::from(1), BigInt::from(2)]);
        assert!(output.values().is_empty());
    }
}
