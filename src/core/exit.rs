//! Process termination behind a swappable strategy
//!
//! `fatal` ends the process through an [`ExitHook`] handed to the logger at
//! construction. Tests install a [`StubbedExit`] on that hook to observe the
//! termination without losing the test process.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What happens when a fatal record has been written
pub trait ExitStrategy: Send + Sync {
    fn exit(&self);
}

/// Terminates the process with status 1
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ExitStrategy for ProcessExit {
    fn exit(&self) {
        std::process::exit(1);
    }
}

/// Records the exit instead of performing it
#[derive(Debug, Default)]
pub struct StubbedExit {
    exited: AtomicBool,
}

impl StubbedExit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `exit` was called while this stub was installed
    pub fn exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }
}

impl ExitStrategy for StubbedExit {
    fn exit(&self) {
        self.exited.store(true, Ordering::Release);
    }
}

/// Cloneable handle over the active exit strategy
///
/// Clones share one strategy slot, so a stub installed through any clone is
/// seen by every logger holding the hook.
#[derive(Clone)]
pub struct ExitHook {
    strategy: Arc<RwLock<Arc<dyn ExitStrategy>>>,
}

impl ExitHook {
    pub fn new(strategy: Arc<dyn ExitStrategy>) -> Self {
        Self {
            strategy: Arc::new(RwLock::new(strategy)),
        }
    }

    /// Hook that really terminates the process
    pub fn process() -> Self {
        Self::new(Arc::new(ProcessExit))
    }

    /// Run the active strategy
    pub fn exit(&self) {
        let strategy = Arc::clone(&self.strategy.read());
        strategy.exit();
    }

    /// Install a recording stub until the returned guard is dropped
    ///
    /// Guards nest: dropping the inner one brings back the outer stub.
    pub fn stub(&self) -> ExitStub {
        let stub = Arc::new(StubbedExit::new());
        let previous = std::mem::replace(
            &mut *self.strategy.write(),
            Arc::clone(&stub) as Arc<dyn ExitStrategy>,
        );
        ExitStub {
            hook: self.clone(),
            stub,
            previous: Some(previous),
        }
    }

    /// Run `f` with a stub installed and hand the stub back for inspection
    ///
    /// # Example
    ///
    /// ```
    /// use rust_telemetry_logger::core::ExitHook;
    ///
    /// let hook = ExitHook::process();
    /// let stub = hook.with_stub(|| hook.exit());
    /// assert!(stub.exited());
    /// ```
    pub fn with_stub<F: FnOnce()>(&self, f: F) -> Arc<StubbedExit> {
        let guard = self.stub();
        f();
        let stub = Arc::clone(&guard.stub);
        guard.unstub();
        stub
    }
}

impl Default for ExitHook {
    fn default() -> Self {
        Self::process()
    }
}

impl std::fmt::Debug for ExitHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitHook").finish_non_exhaustive()
    }
}

/// Restores the previous exit strategy when unstubbed or dropped
#[must_use = "the stub is removed as soon as the guard is dropped"]
pub struct ExitStub {
    hook: ExitHook,
    stub: Arc<StubbedExit>,
    previous: Option<Arc<dyn ExitStrategy>>,
}

impl ExitStub {
    pub fn exited(&self) -> bool {
        self.stub.exited()
    }

    pub fn unstub(self) {}
}

impl Drop for ExitStub {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.hook.strategy.write() = previous;
        }
    }
}
