//! In-process destinations: memory capture and null

use crate::core::Destination;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    batches: Vec<Vec<u8>>,
    flushes: usize,
    failing: bool,
}

/// Keeps every write as a separate batch for later inspection
///
/// # Example
///
/// ```
/// use rust_telemetry_logger::core::Destination;
/// use rust_telemetry_logger::destinations::MemoryDestination;
///
/// let mut memory = MemoryDestination::new();
/// let handle = memory.handle();
///
/// memory.write(b"hello\n").unwrap();
/// assert_eq!(handle.contents(), b"hello\n");
/// ```
#[derive(Debug, Default)]
pub struct MemoryDestination {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read side that stays valid after the destination moves into a sink
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Destination for MemoryDestination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "memory destination failing"));
        }
        state.batches.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "memory destination failing"));
        }
        state.flushes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Shared view of a [`MemoryDestination`]
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryHandle {
    /// Every accepted write, in order
    pub fn batches(&self) -> Vec<Vec<u8>> {
        self.state.lock().batches.clone()
    }

    /// All accepted bytes concatenated
    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().batches.concat()
    }

    /// Accepted bytes parsed as JSON lines; lines that are not JSON are skipped
    pub fn lines(&self) -> Vec<serde_json::Value> {
        let contents = self.contents();
        contents
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_slice(line).ok())
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    /// Make every write and flush fail until turned off again
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn clear(&self) {
        self.state.lock().batches.clear();
    }
}

/// Accepts and discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDestination;

impl Destination for NullDestination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
