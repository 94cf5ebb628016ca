//! Batch execution engine
//!
//! Provides sequential and bounded-parallel fetch execution.

mod parallel;
mod pool;
mod serial;
mod task;

pub use parallel::{run_parallel, ParallelRunner};
pub use pool::{PoolError, WorkerPool};
pub use serial::{run_serial, SerialRunner};
pub use task::{preview, TimedTask, PREVIEW_CHARS};
