//! Interactive ports backed by the process's standard streams.

use super::{InputPort, OutputPort, PortError};
use num_bigint::BigInt;
use std::io::{BufRead, Write};

/// Line-oriented input, one integer per line.
///
/// A line reader cannot be polled without blocking, so this port always
/// reports itself ready and a read waits for the user.
pub struct StdinInput<R = std::io::StdinLock<'static>> {
    reader: R,
    prompt: bool,
}

impl StdinInput {
    /// Read from the process's standard input, printing a `?: ` prompt.
    pub fn new() -> Self {
        Self::from_reader(std::io::stdin().lock(), true)
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinInput<R> {
    pub fn from_reader(reader: R, prompt: bool) -> Self {
        Self { reader, prompt }
    }
}

impl<R: BufRead> InputPort for StdinInput<R> {
    fn ready(&self) -> bool {
        true
    }

    fn read(&mut self) -> Result<BigInt, PortError> {
        if self.prompt {
            print!("?: ");
            std::io::stdout().flush()?;
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PortError::InputExhausted);
        }

        let trimmed = line.trim();
        trimmed
            .parse::<BigInt>()
            .map_err(|_| PortError::InvalidInput(trimmed.to_string()))
    }
}

/// Output that prints each value on its own line.
pub struct StdoutOutput<W = std::io::Stdout> {
    writer: W,
}

impl StdoutOutput {
    pub fn new() -> Self {
        Self::from_writer(std::io::stdout())
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutOutput<W> {
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputPort for StdoutOutput<W> {
    fn write(&mut self, value: BigInt) -> Result<(), PortError> {
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_one_integer_per_line() {
        let mut input = StdinInput::from_reader(&b"42\n  -7  \n"[..], false);

        assert!(input.ready());
        assert_eq!(input.read(), Ok(BigInt::from(42)));
        assert_eq!(input.read(), Ok(BigInt::from(-7)));
        assert_eq!(input.read(), Err(PortError::InputExhausted));
    }

    #[test]
    fn test_rejects_non_numeric_line() {
        let mut input = StdinInput::from_reader(&b"abc\n"[..], false);
        assert_eq!(input.read(), Err(PortError::InvalidInput("abc".into())));
    }

    #[test]
    fn test_prints_one_value_per_line() {
        let mut output = StdoutOutput::from_writer(Vec::new());
        output.write(BigInt::from(1)).unwrap();
        output.write(BigInt::from(-20)).unwrap();

        assert_eq!(output.into_inner(), b"1\n-20\n");
    }
}
