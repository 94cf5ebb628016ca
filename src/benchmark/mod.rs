//! Serial vs. parallel comparison and latency metrics

mod compare;
mod metrics;

pub use compare::{Comparison, ComparisonReport, RoundReport, Strategy};
pub use metrics::{LatencyStats, Percentiles};
