//! Bounded-parallel batch execution
//!
//! A batch becomes one job per URL on the runner's [`WorkerPool`]. Each job
//! sends its outcome back over a per-batch channel; the submitting thread
//! blocks until every job has reported, then slots outcomes back into request
//! order by index.

use crossbeam::channel;
use std::sync::Arc;
use tracing::{debug, info};

use super::{PoolError, TimedTask, WorkerPool};
use crate::fetch::Fetcher;
use crate::models::{BatchReport, FetchOutcome, FetchRequest, RunMode};
use crate::output::console;
use crate::utils::Timer;

/// Runs fetches on a fixed-size pool of worker threads
///
/// The pool lives as long as the runner and is reused by every call to
/// [`ParallelRunner::run`]. A fetch that never returns occupies its worker
/// forever; configure a timeout on the fetcher if that matters.
pub struct ParallelRunner {
    pool: WorkerPool,
    fetcher: Arc<dyn Fetcher>,
    echo: bool,
}

impl ParallelRunner {
    pub fn new(fetcher: Arc<dyn Fetcher>, pool_size: usize) -> Result<Self, PoolError> {
        Ok(Self {
            pool: WorkerPool::new(pool_size)?,
            fetcher,
            echo: true,
        })
    }

    /// Suppress per-task and summary lines on stdout
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.echo = !quiet;
        self
    }

    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Fetch every URL on the pool and wait for all of them.
    ///
    /// Individual fetch failures are recorded in their outcomes. Only
    /// pool-level problems fail the call.
    pub fn run<S: AsRef<str>>(&self, urls: &[S]) -> Result<BatchReport, PoolError> {
        if self.pool.is_shut_down() {
            return Err(PoolError::ShutDown);
        }

        let mode = RunMode::Parallel {
            pool_size: self.pool.size(),
        };
        if urls.is_empty() {
            debug!("Empty batch, nothing to dispatch");
            return Ok(BatchReport::empty(mode));
        }

        let expected = urls.len();
        info!(
            "Dispatching {} URLs to {} workers",
            expected,
            self.pool.size()
        );

        // Capacity covers every outcome so workers never block on send.
        let (outcome_tx, outcome_rx) = channel::bounded::<FetchOutcome>(expected);

        let timer = Timer::start("parallel batch");
        for request in FetchRequest::batch(urls) {
            let outcome_tx = outcome_tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let echo = self.echo;

            self.pool.submit(move || {
                let outcome = TimedTask::new(request).echo(echo).run(&*fetcher);
                // Only fails if the submitter already gave up on the batch.
                let _ = outcome_tx.send(outcome);
            })?;
        }
        drop(outcome_tx);

        let mut slots: Vec<Option<FetchOutcome>> = (0..expected).map(|_| None).collect();
        let mut received = 0;
        for outcome in outcome_rx.iter() {
            let index = outcome.index();
            slots[index] = Some(outcome);
            received += 1;
        }

        let started_at = timer.started_at();
        let elapsed = timer.stop();

        let outcomes = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(PoolError::Incomplete { expected, received })?;

        let report = BatchReport::new(mode, outcomes, elapsed, started_at);
        if self.echo {
            console::print_line(&console::summary_line(&report));
        }

        info!(
            "Parallel batch completed in {}ms - {}/{} ok",
            report.total_elapsed_ms(),
            report.succeeded(),
            report.len()
        );
        Ok(report)
    }

    /// Stop and join all worker threads. Later calls to `run` fail with
    /// [`PoolError::ShutDown`].
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }
}

/// One-shot parallel batch on a pool that is torn down before returning
pub fn run_parallel<S: AsRef<str>>(
    fetcher: Arc<dyn Fetcher>,
    urls: &[S],
    pool_size: usize,
    quiet: bool,
) -> Result<BatchReport, PoolError> {
    let mut runner = ParallelRunner::new(fetcher, pool_size)?.quiet(quiet);
    let report = runner.run(urls);
    runner.shutdown();
    report
}
