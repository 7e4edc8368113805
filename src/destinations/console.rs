//! Standard output and standard error destinations

use crate::core::Destination;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

/// Writes records to the process console
#[derive(Debug)]
pub struct ConsoleDestination {
    target: ConsoleTarget,
}

impl ConsoleDestination {
    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Default for ConsoleDestination {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Destination for ConsoleDestination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // the std handles hold their own lock per call
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write(buf),
            ConsoleTarget::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }

    fn is_console(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_names() {
        assert_eq!(ConsoleDestination::stdout().name(), "stdout");
        assert_eq!(ConsoleDestination::stderr().name(), "stderr");
        assert_eq!(ConsoleDestination::default().target(), ConsoleTarget::Stdout);
    }

    #[test]
    fn test_console_write_accepts_bytes() {
        let mut console = ConsoleDestination::stderr();
        let written = console.write(b"console destination test\n").unwrap();
        assert!(written > 0);
        assert!(console.flush().is_ok());
    }
}
