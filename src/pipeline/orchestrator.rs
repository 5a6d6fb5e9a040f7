use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::PipelineError;
use crate::pipeline::limiter::ConcurrencyLimiter;

/// A batch whose task did not complete
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the batch in dispatch order
    pub batch: usize,
    pub error: PipelineError,
}

/// Outcome of one fan-out/fan-in run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub dispatched: usize,
    pub completed: usize,
    /// Records handed to the store by completed tasks
    pub records: usize,
    pub failed: Vec<BatchFailure>,
    /// Batches never started because no capacity could be acquired
    pub skipped: Vec<usize>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Runs one task per batch under a [`ConcurrencyLimiter`]
#[derive(Clone)]
pub struct Orchestrator {
    limiter: ConcurrencyLimiter,
}

impl Orchestrator {
    pub fn new(limiter: ConcurrencyLimiter) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Run `task` for every batch and wait for all of them.
    ///
    /// A slot is acquired before each batch is dispatched; a batch whose
    /// acquisition fails is skipped and the loop moves on. Task errors end only
    /// that task. Returns after every dispatched task has finished.
    ///
    /// Batch tasks are detached: dropping the returned future stops dispatching
    /// but lets batches already running finish.
    pub async fn run<I, B, F, Fut>(&self, batches: I, task: F) -> RunSummary
    where
        I: IntoIterator<Item = B>,
        F: Fn(B) -> Fut,
        Fut: Future<Output = Result<usize, PipelineError>> + Send + 'static,
    {
        let mut summary = RunSummary::default();
        let mut tasks: Vec<(usize, JoinHandle<Result<usize, PipelineError>>)> = Vec::new();

        for (index, batch) in batches.into_iter().enumerate() {
            let permit = match self.limiter.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(batch = index, error = %e, "Skipping batch");
                    summary.skipped.push(index);
                    continue;
                }
            };

            let work = task(batch);
            summary.dispatched += 1;
            let handle = tokio::spawn(async move {
                let _permit = permit;
                work.await
            });
            tasks.push((index, handle));
        }

        for (index, handle) in tasks {
            match handle.await {
                Ok(Ok(records)) => {
                    debug!(batch = index, records, "Batch complete");
                    summary.completed += 1;
                    summary.records += records;
                }
                Ok(Err(e)) => {
                    warn!(batch = index, stage = e.stage(), error = %e, "Batch failed");
                    summary.failed.push(BatchFailure {
                        batch: index,
                        error: e,
                    });
                }
                Err(e) => {
                    error!(batch = index, error = %e, "Batch task panicked");
                    summary.failed.push(BatchFailure {
                        batch: index,
                        error: PipelineError::Task(e.to_string()),
                    });
                }
            }
        }

        summary
    }
}
