//! Byte destinations and the shared sink handle over them

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// A byte-oriented output the logger writes encoded records into.
///
/// Implementations are assumed already provisioned and reachable; the
/// logger neither creates nor health-checks them.
pub trait Destination: Send {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn flush(&mut self) -> io::Result<()>;
    fn name(&self) -> &str;

    /// Whether records land on the local console, where colored text is readable
    fn is_console(&self) -> bool {
        false
    }
}

/// Push `buf` into `destination` until it is fully accepted or fails.
///
/// Returns how many bytes were accepted alongside the outcome, so callers
/// can keep the remainder instead of losing or duplicating it.
pub(crate) fn write_batch(destination: &mut dyn Destination, buf: &[u8]) -> (usize, io::Result<()>) {
    let mut written = 0;
    while written < buf.len() {
        match destination.write(&buf[written..]) {
            Ok(0) => {
                return (
                    written,
                    Err(io::Error::new(io::ErrorKind::WriteZero, "destination accepted no bytes")),
                )
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (written, Err(e)),
        }
    }
    (written, Ok(()))
}

/// Shared, internally synchronized handle a pipeline writes through
pub trait Sink: Send + Sync {
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Push everything accepted so far to the destination
    fn sync(&self) -> Result<()>;

    /// Final sync, then release the destination. Later calls are no-ops.
    fn close(&self) -> Result<()>;

    fn name(&self) -> &str;
}

/// Unbuffered sink: every write goes straight to the destination
pub struct LockedSink {
    name: String,
    destination: Mutex<Option<Box<dyn Destination>>>,
    closed: AtomicBool,
}

impl LockedSink {
    pub fn new(destination: Box<dyn Destination>) -> Self {
        Self {
            name: destination.name().to_string(),
            destination: Mutex::new(Some(destination)),
            closed: AtomicBool::new(false),
        }
    }
}

impl Sink for LockedSink {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.destination.lock();
        // released destinations swallow late writes
        let Some(destination) = guard.as_mut() else {
            return Ok(());
        };
        let (_, outcome) = write_batch(&mut **destination, bytes);
        outcome.map_err(|e| LoggerError::write_failure(&self.name, e))
    }

    fn sync(&self) -> Result<()> {
        match self.destination.lock().as_mut() {
            Some(destination) => destination
                .flush()
                .map_err(|e| LoggerError::write_failure(&self.name, e)),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let result = self.sync();
        self.destination.lock().take();
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::MemoryDestination;

    struct Trickle {
        accepted: Vec<u8>,
    }

    impl Destination for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            // two bytes at a time
            let n = buf.len().min(2);
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "trickle"
        }
    }

    #[test]
    fn test_write_batch_handles_short_writes() {
        let mut trickle = Trickle { accepted: Vec::new() };
        let (written, outcome) = write_batch(&mut trickle, b"hello world");
        assert!(outcome.is_ok());
        assert_eq!(written, 11);
        assert_eq!(trickle.accepted, b"hello world");
    }

    #[test]
    fn test_locked_sink_writes_through() {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let sink = LockedSink::new(Box::new(memory));

        sink.write(b"one\n").unwrap();
        sink.write(b"two\n").unwrap();
        assert_eq!(handle.batches().len(), 2);
        assert_eq!(handle.contents(), b"one\ntwo\n");
    }

    #[test]
    fn test_locked_sink_close_is_one_shot() {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let sink = LockedSink::new(Box::new(memory));

        sink.close().unwrap();
        sink.close().unwrap();
        assert_eq!(handle.flush_count(), 1);

        // late writes are dropped, not errors
        sink.write(b"late\n").unwrap();
        assert!(handle.contents().is_empty());
    }

    #[test]
    fn test_locked_sink_reports_failure() {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let sink = LockedSink::new(Box::new(memory));

        handle.set_failing(true);
        let err = sink.write(b"x").unwrap_err();
        assert!(matches!(err, LoggerError::WriteFailure { .. }));
    }
}
