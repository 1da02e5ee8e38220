//! Per-session interrupt signal
//!
//! Raised by the user-message path and observed by the discussion pipeline
//! at every suspension point. Replaces wall-clock polling of recent
//! messages: the flag survives until a stage boundary consumes it, and the
//! notify wakes any wait currently in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Interrupt flag with wakeup
#[derive(Debug, Default)]
pub struct InterruptSignal {
    pending: AtomicBool,
    notify: Notify,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an interruption and wake any in-progress wait
    pub fn raise(&self) {
        self.pending.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Whether an interruption is pending
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Consume a pending interruption, if any
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Resolve when an interruption is pending or newly raised.
    ///
    /// Registers the waiter before checking the flag so a `raise` between
    /// check and await cannot be lost.
    pub async fn triggered(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_pending() {
            return;
        }
        notified.await;
    }
}
