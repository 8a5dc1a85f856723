//! Restartable quiet-period timer for query input.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet interval used when none is configured.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(300);

/// Collapses a burst of raw values into a single settled value.
///
/// Every `push` cancels the pending emission and schedules a new one after
/// the quiet interval. Settled values arrive on the receiver returned by
/// [`Debouncer::new`]. Dropping the debouncer cancels any pending emission.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                quiet,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Record a raw value, restarting the quiet period.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            // The consumer may already be gone.
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending emission, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether an emission is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
