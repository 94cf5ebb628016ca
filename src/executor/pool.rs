//! Fixed-size worker thread pool
//!
//! Workers share one FIFO job queue (a crossbeam MPMC channel). Jobs run to
//! completion; there is no cancellation. Shutting down closes the queue, lets
//! the workers drain whatever is still queued, and joins every thread.

use crossbeam::channel::{self, Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error, trace, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pool-level failures. These abort a whole batch.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("pool size must be at least 1")]
    InvalidSize,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker pool has been shut down")]
    ShutDown,

    #[error("batch incomplete: expected {expected} outcomes, received {received}")]
    Incomplete { expected: usize, received: usize },
}

/// Decrements the live-worker count when a worker thread ends
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fixed set of reusable worker threads
pub struct WorkerPool {
    size: usize,
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    live: Arc<AtomicUsize>,
    submitted: AtomicU64,
}

impl WorkerPool {
    /// Spawn `size` named worker threads
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::InvalidSize);
        }

        let (sender, receiver) = channel::unbounded::<Job>();
        let mut pool = Self {
            size,
            sender: Some(sender),
            workers: Vec::with_capacity(size),
            live: Arc::new(AtomicUsize::new(0)),
            submitted: AtomicU64::new(0),
        };

        for id in 0..size {
            let jobs = receiver.clone();
            let guard = LiveGuard::register(&pool.live);
            // On spawn failure the closure (and guard) is dropped and the
            // already-running workers are joined by Drop.
            let handle = thread::Builder::new()
                .name(format!("parfetch-worker-{id}"))
                .spawn(move || worker_loop(id, jobs, guard))?;
            pool.workers.push(handle);
        }

        debug!("Started worker pool with {} threads", size);
        Ok(pool)
    }

    /// Queue a job. Fails only once the pool has been shut down.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::ShutDown)?;
        sender
            .send(Box::new(job))
            .map_err(|_| PoolError::ShutDown)?;
        self.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Worker threads currently running
    pub fn live_workers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Shared live-worker counter; stays readable after the pool is dropped
    pub fn live_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live)
    }

    /// Total jobs accepted since the pool was created
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.is_none()
    }

    /// Close the queue and join every worker. Blocks until in-flight and
    /// already-queued jobs have finished. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        drop(sender);

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread ended with a panic");
            }
        }
        debug!("Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("live", &self.live_workers())
            .field("submitted", &self.submitted())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn worker_loop(id: usize, jobs: Receiver<Job>, _guard: LiveGuard) {
    trace!(worker = id, "Worker started");
    for job in jobs.iter() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(worker = id, "Job panicked; worker continues");
        }
    }
    trace!(worker = id, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(PoolError::InvalidSize)));
    }

    #[test]
    fn test_pool_runs_all_jobs() {
        let pool = WorkerPool::new(4).unwrap();
        let (tx, rx) = channel::unbounded();

        for i in 0..32 {
            let tx = tx.clone();
            pool.submit(move || tx.send(i).unwrap()).unwrap();
        }
        drop(tx);

        let mut seen: Vec<i32> = rx.iter().collect();
        seen.sort();
        assert_eq!(seen, (0..32).collect::<Vec<_>>());
        assert_eq!(pool.submitted(), 32);
    }

    #[test]
    fn test_workers_run_in_parallel() {
        let pool = WorkerPool::new(4).unwrap();
        let (tx, rx) = channel::unbounded();
        let names = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..4 {
            let tx = tx.clone();
            let names = Arc::clone(&names);
            pool.submit(move || {
                thread::sleep(Duration::from_millis(50));
                let name = thread::current().name().map(String::from);
                names.lock().unwrap().push(name);
                tx.send(()).unwrap();
            })
            .unwrap();
        }
        drop(tx);

        let start = std::time::Instant::now();
        assert_eq!(rx.iter().count(), 4);
        assert!(start.elapsed() < Duration::from_millis(180));

        let names = names.lock().unwrap();
        assert!(names
            .iter()
            .all(|n| n.as_deref().is_some_and(|n| n.starts_with("parfetch-worker-"))));
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = channel::unbounded();

        pool.submit(|| panic!("job failure")).unwrap();
        pool.submit(move || tx.send("still alive").unwrap()).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok("still alive"));
        assert_eq!(pool.live_workers(), 1);
    }

    #[test]
    fn test_shutdown_joins_workers() {
        let mut pool = WorkerPool::new(8).unwrap();
        let live = pool.live_counter();
        assert_eq!(live.load(Ordering::SeqCst), 8);

        pool.shutdown();
        assert!(pool.is_shut_down());
        assert_eq!(live.load(Ordering::SeqCst), 0);

        pool.shutdown();
        assert!(matches!(pool.submit(|| {}), Err(PoolError::ShutDown)));
    }

    #[test]
    fn test_drop_joins_workers() {
        let live = {
            let pool = WorkerPool::new(3).unwrap();
            pool.live_counter()
        };
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_shutdown_drains_queued_jobs() {
        let mut pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = channel::unbounded();

        for i in 0..5 {
            let tx = tx.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(5));
                tx.send(i).unwrap();
            })
            .unwrap();
        }
        drop(tx);
        pool.shutdown();

        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }
}
