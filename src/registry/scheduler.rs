/// Delayed cue scheduling with cancellation
///
/// Each delayed cue waits on its own thread for either the timer or the
/// cancellation channel of the generation it was scheduled in. Cancelling
/// drops that generation's sender, which wakes every waiter at once.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, Receiver, Sender};
use parking_lot::Mutex;

struct CancelGroup {
    _sender: Sender<()>,
    receiver: Receiver<()>,
}

impl CancelGroup {
    fn new() -> Self {
        let (sender, receiver) = bounded(0);
        Self {
            _sender: sender,
            receiver,
        }
    }
}

/// Decrements the pending count when a cue thread ends, however it ends
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct DelayScheduler {
    group: Mutex<CancelGroup>,
    pending: Arc<AtomicUsize>,
}

impl DelayScheduler {
    pub fn new() -> Self {
        Self {
            group: Mutex::new(CancelGroup::new()),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run `task` after `delay` unless `cancel_all` is called first
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let cancelled = self.group.lock().receiver.clone();
        self.pending.fetch_add(1, Ordering::SeqCst);
        let guard = PendingGuard(Arc::clone(&self.pending));

        thread::spawn(move || {
            let _guard = guard;
            let fire = select! {
                recv(after(delay)) -> _ => true,
                recv(cancelled) -> _ => false,
            };
            if fire {
                task();
            } else {
                tracing::debug!("Delayed cue cancelled before firing");
            }
        });
    }

    /// Cancel every cue scheduled so far; later cues are unaffected
    pub fn cancel_all(&self) {
        let previous = std::mem::replace(&mut *self.group.lock(), CancelGroup::new());
        drop(previous);
        tracing::debug!("Cancelled pending delayed cues");
    }

    /// Cues still waiting or running
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl Default for DelayScheduler {
    fn default() -> Self {
        Self::new()
    }
}
