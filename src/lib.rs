//! parfetch - serial vs. bounded-parallel URL fetching
//!
//! Fetches the body of every URL in a list, once on the calling thread and
//! once on a fixed-size pool of worker threads, and reports per-URL and total
//! wall-clock times.
//!
//! ```no_run
//! use std::sync::Arc;
//! use parfetch::executor::{run_parallel, run_serial};
//! use parfetch::fetch::HttpFetcher;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let urls = ["https://www.rust-lang.org", "https://crates.io"];
//!
//! let serial = run_serial(fetcher.clone(), &urls, false);
//! let parallel = run_parallel(fetcher, &urls, 20, false)?;
//! assert_eq!(serial.len(), parallel.len());
//! # Ok(())
//! # }
//! ```

pub mod benchmark;
pub mod cli;
pub mod config;
pub mod executor;
pub mod fetch;
pub mod models;
pub mod output;
pub mod utils;

pub use executor::{run_parallel, run_serial, ParallelRunner, PoolError, SerialRunner};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use models::{BatchReport, FetchOutcome, FetchRequest, RunMode};
