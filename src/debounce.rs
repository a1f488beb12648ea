use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Runs only the most recent of a burst of scheduled tasks.
///
/// Each `schedule` aborts whatever is still pending and starts a new timer.
/// Dropping the debouncer aborts the pending task, so no result is delivered
/// to a screen that has gone away.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("aborting superseded task");
            }
            handle.abort();
        }
    }

    /// Waits for the pending task, if any, to run to completion.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.pending.as_mut() {
            // An aborted or panicked task has nothing left to deliver.
            let _ = handle.await;
        }
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
