//! Console sink implementation

use crate::core::{Result, Sink};
use std::io::Write;

/// Standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::stdout()
    }

    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // A single write_all keeps the line whole even if another process
        // shares the stream.
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(buf.as_bytes())?,
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(buf.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stdout() {
        let sink = ConsoleSink::default();
        assert_eq!(sink.stream(), ConsoleStream::Stdout);
        assert_eq!(sink.name(), "stdout");
    }

    #[test]
    fn test_write_and_flush_stderr() {
        let mut sink = ConsoleSink::stderr();
        sink.write_line(r#"{"message":"console sink test"}"#).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "stderr");
    }
}
