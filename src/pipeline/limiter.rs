use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::{PipelineError, Result};

/// Counting limiter bounding how many batch tasks run at once
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize, cancel: CancellationToken) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            cancel,
        }
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for one slot.
    ///
    /// Fails once the cancellation token fires, even while waiting. The slot is
    /// released when the returned permit is dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Acquire("crawl cancelled".into()));
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PipelineError::Acquire("crawl cancelled".into())),
            permit = Arc::clone(&self.semaphore).acquire_owned() => {
                permit.map_err(|_| PipelineError::Acquire("limiter closed".into()))
            }
        }
    }
}
