//! Size- and time-bounded write-behind buffer over a destination
//!
//! Writes accumulate in memory and reach the destination in batches: when
//! the next write would overflow the capacity, when the background ticker
//! fires, or on an explicit [`Sink::sync`] / [`Sink::close`].
//!
//! # Error visibility
//!
//! Errors from `sync` and `close` go back to the caller. Errors hit by the
//! background flush have no caller to go to; they are counted in
//! [`SinkMetrics::background_failures`] and handed to the optional
//! [`FlushErrorCallback`] (or printed to stderr when none is installed).
//! A destination that keeps failing is therefore only visible through
//! those channels until the next explicit `sync`/`close`.

use super::destination::{write_batch, Destination, Sink};
use super::error::{LoggerError, Result};
use super::metrics::SinkMetrics;
use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default buffer capacity (256 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Default interval between background flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);

/// Called with every error the background flush runs into
pub type FlushErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

struct BufferState {
    destination: Option<Box<dyn Destination>>,
    buf: Vec<u8>,
    capacity: usize,
}

struct Shared {
    name: String,
    state: Mutex<BufferState>,
    metrics: SinkMetrics,
    on_error: Option<FlushErrorCallback>,
}

impl Shared {
    /// Move the buffer into the destination. Caller holds the state lock.
    fn flush_locked(&self, state: &mut BufferState) -> Result<()> {
        let Some(destination) = state.destination.as_mut() else {
            state.buf.clear();
            return Ok(());
        };

        if !state.buf.is_empty() {
            let (written, outcome) = write_batch(&mut **destination, &state.buf);
            state.buf.drain(..written);
            if written > 0 {
                self.metrics.record_flush(written);
            }
            outcome.map_err(|e| LoggerError::write_failure(&self.name, e))?;
        }

        destination
            .flush()
            .map_err(|e| LoggerError::write_failure(&self.name, e))
    }

    fn background_flush(&self) {
        let result = {
            let mut state = self.state.lock();
            self.flush_locked(&mut state)
        };

        if let Err(err) = result {
            self.metrics.record_background_failure();
            match &self.on_error {
                Some(callback) => callback(&err),
                None => eprintln!("[LOGGER ERROR] Background flush failed: {}", err),
            }
        }
    }
}

struct Worker {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

/// Write-behind sink with one background flush thread
///
/// # Example
///
/// ```
/// use rust_telemetry_logger::core::{BufferedSink, Sink};
/// use rust_telemetry_logger::destinations::MemoryDestination;
/// use std::time::Duration;
///
/// let memory = MemoryDestination::new();
/// let handle = memory.handle();
///
/// let sink = BufferedSink::new(Box::new(memory), 1024, Duration::from_secs(5)).unwrap();
/// sink.write(b"{\"msg\":\"hello\"}\n").unwrap();
/// assert!(handle.contents().is_empty());
///
/// sink.close().unwrap();
/// assert_eq!(handle.contents(), b"{\"msg\":\"hello\"}\n");
/// ```
pub struct BufferedSink {
    shared: Arc<Shared>,
    flush_interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl BufferedSink {
    /// Wrap `destination`; a zero capacity or interval selects the default
    pub fn new(
        destination: Box<dyn Destination>,
        capacity: usize,
        flush_interval: Duration,
    ) -> Result<Self> {
        Self::with_callback(destination, capacity, flush_interval, None)
    }

    /// Like [`BufferedSink::new`], with a callback for background flush errors
    pub fn with_callback(
        destination: Box<dyn Destination>,
        capacity: usize,
        flush_interval: Duration,
        on_error: Option<FlushErrorCallback>,
    ) -> Result<Self> {
        let capacity = if capacity == 0 { DEFAULT_BUFFER_SIZE } else { capacity };
        let flush_interval = if flush_interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            flush_interval
        };

        let shared = Arc::new(Shared {
            name: destination.name().to_string(),
            state: Mutex::new(BufferState {
                destination: Some(destination),
                buf: Vec::with_capacity(capacity),
                capacity,
            }),
            metrics: SinkMetrics::new(),
            on_error,
        });

        let (cancel, cancelled) = bounded::<()>(0);
        let ticker = tick(flush_interval);
        let shared_clone = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name(format!("flush-{}", shared.name))
            .spawn(move || loop {
                select! {
                    recv(ticker) -> _ => shared_clone.background_flush(),
                    // fires on disconnect as well
                    recv(cancelled) -> _ => break,
                }
            })
            .map_err(|e| LoggerError::unavailable(&shared.name, format!("flush thread: {}", e)))?;

        Ok(Self {
            shared,
            flush_interval,
            worker: Mutex::new(Some(Worker { cancel, handle })),
        })
    }

    pub fn capacity(&self) -> usize {
        self.shared.state.lock().capacity
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Bytes accepted but not yet handed to the destination
    pub fn buffered(&self) -> usize {
        self.shared.state.lock().buf.len()
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.shared.metrics
    }
}

impl Sink for BufferedSink {
    /// Buffer `bytes`, flushing earlier content first when they would not fit.
    ///
    /// A write is never split across two batches. One larger than the whole
    /// capacity goes to the destination as a batch of its own.
    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        if !state.buf.is_empty() && state.buf.len() + bytes.len() > state.capacity {
            self.shared.flush_locked(state)?;
        }

        if state.buf.is_empty() && bytes.len() >= state.capacity {
            if let Some(destination) = state.destination.as_mut() {
                let (written, outcome) = write_batch(&mut **destination, bytes);
                if written > 0 {
                    self.shared.metrics.record_flush(written);
                }
                if let Err(e) = outcome {
                    // keep the tail for the next flush
                    state.buf.extend_from_slice(&bytes[written..]);
                    return Err(LoggerError::write_failure(&self.shared.name, e));
                }
                return Ok(());
            }
        }

        state.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        self.shared.flush_locked(&mut state)
    }

    fn close(&self) -> Result<()> {
        let Some(worker) = self.worker.lock().take() else {
            return Ok(());
        };

        drop(worker.cancel);
        if worker.handle.join().is_err() {
            eprintln!(
                "[LOGGER ERROR] Flush thread for '{}' panicked before close",
                self.shared.name
            );
        }

        let mut state = self.shared.state.lock();
        let result = self.shared.flush_locked(&mut state);
        state.destination = None;
        result
    }

    fn name(&self) -> &str {
        &self.shared.name
    }
}

impl Drop for BufferedSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}
