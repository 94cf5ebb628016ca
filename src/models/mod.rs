//! Data models for batch fetching
//!
//! Requests, per-task outcomes and batch reports.

mod report;
mod request;

pub use report::{BatchReport, RunMode};
pub use request::{FetchOutcome, FetchRequest};
