//! Debounced writer
//!
//! Coalesces bursts of writes into one flush after a quiet period. The
//! pending value lives behind a mutex shared with a background task that
//! only owns the deadline; the flush callback runs under that mutex, so once
//! [`DebouncedWriter::cancel`] returns no stale value can still be flushed.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Default quiet period
pub const DEFAULT_QUIET_MS: u64 = 500;

type Sink<T> = Box<dyn FnMut(T) + Send>;

struct Slot<T> {
    pending: Option<T>,
    sink: Sink<T>,
}

impl<T> Slot<T> {
    fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(value) => {
                (self.sink)(value);
                true
            }
            None => false,
        }
    }
}

/// Accepts values and flushes the latest one after `quiet` of inactivity
///
/// Must be created inside a tokio runtime.
pub struct DebouncedWriter<T: Send + 'static> {
    slot: Arc<Mutex<Slot<T>>>,
    touch: mpsc::UnboundedSender<()>,
    shutdown: CancellationToken,
}

impl<T: Send + 'static> DebouncedWriter<T> {
    pub fn new<F>(quiet: Duration, sink: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Slot {
            pending: None,
            sink: Box::new(sink),
        }));
        let (touch, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        tokio::spawn(run_timer(slot.clone(), rx, quiet, shutdown.clone()));
        Self {
            slot,
            touch,
            shutdown,
        }
    }

    /// Replace the pending value and restart the quiet period
    pub fn write(&self, value: T) {
        self.slot.lock().pending = Some(value);
        if self.touch.send(()).is_err() {
            tracing::debug!("Debounce timer gone, value stays pending until flush");
        }
    }

    /// Flush the pending value now; returns whether anything was written
    pub fn flush(&self) -> bool {
        self.slot.lock().flush()
    }

    /// Drop the pending value without writing it
    pub fn cancel(&self) {
        self.slot.lock().pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl<T: Send + 'static> Drop for DebouncedWriter<T> {
    fn drop(&mut self) {
        self.slot.lock().flush();
        self.shutdown.cancel();
    }
}

async fn run_timer<T: Send + 'static>(
    slot: Arc<Mutex<Slot<T>>>,
    mut touch: mpsc::UnboundedReceiver<()>,
    quiet: Duration,
    shutdown: CancellationToken,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            _ = shutdown.cancelled() => break,

            _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                if slot.lock().flush() {
                    tracing::debug!("Debounced write flushed");
                }
                deadline = None;
            }

            msg = touch.recv() => {
                match msg {
                    Some(()) => deadline = Some(Instant::now() + quiet),
                    None => break,
                }
            }
        }
    }
}
