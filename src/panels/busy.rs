//! Busy flag with scoped release.
//!
//! Every asynchronous panel operation takes a [`BusyGuard`] before its first
//! suspension point. Dropping the guard clears the flag, so the flag settles
//! on success, on failure, and when the operation's future is cancelled.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::signals::{LoadingListener, LoadingSignal, NoopLoadingListener};

/// Per-panel loading flag that echoes each change to a listener.
pub struct BusyFlag {
    busy: AtomicBool,
    listener: Arc<dyn LoadingListener>,
}

impl BusyFlag {
    /// Creates an idle flag reporting to `listener`.
    #[must_use]
    pub fn new(listener: Arc<dyn LoadingListener>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            listener,
        }
    }

    /// Creates an idle flag nobody listens to.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(NoopLoadingListener))
    }

    /// Current flag value.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Sets the flag and emits the matching signal.
    pub fn set(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        self.listener.on_loading(LoadingSignal::from_busy(busy));
    }

    /// Marks the flag busy until the returned guard is dropped.
    pub fn hold(&self) -> BusyGuard<'_> {
        self.set(true);
        BusyGuard { flag: self }
    }
}

impl fmt::Debug for BusyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusyFlag")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Clears its [`BusyFlag`] when dropped.
#[derive(Debug)]
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard<'flag> {
    flag: &'flag BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
