use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// A future scheduled to start after a delay. Cancelling only stops the
/// timer; once the delay has elapsed the work is detached and runs to
/// completion.
pub struct DelayedTask {
    timer: JoinHandle<()>,
}

impl DelayedTask {
    pub fn schedule<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(work);
        });
        Self { timer }
    }

    pub fn cancel(&self) {
        self.timer.abort();
    }

    /// True while the delay has not yet elapsed.
    pub fn is_pending(&self) -> bool {
        !self.timer.is_finished()
    }
}

/// Collapses bursts of calls into one: each `schedule` replaces whatever was
/// still waiting.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<DelayedTask>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = DelayedTask::schedule(self.delay, work);
        if let Some(previous) = self.pending.lock().replace(task) {
            previous.cancel();
        }
    }

    /// Cancel the waiting call, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(task) => {
                let was_pending = task.is_pending();
                task.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(DelayedTask::is_pending)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.cancel();
        }
    }
}
