//! Batch-level report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::FetchOutcome;

/// How a batch was executed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RunMode {
    Serial,
    Parallel { pool_size: usize },
}

impl RunMode {
    pub fn name(&self) -> &'static str {
        match self {
            RunMode::Serial => "serial",
            RunMode::Parallel { .. } => "parallel",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Serial => write!(f, "serial"),
            RunMode::Parallel { pool_size } => write!(f, "parallel x{pool_size}"),
        }
    }
}

/// Ordered outcomes of one batch plus its wall-clock duration
#[derive(Clone, Debug)]
pub struct BatchReport {
    mode: RunMode,
    outcomes: Vec<FetchOutcome>,
    total_elapsed_nanos: u64,
    started_at: DateTime<Utc>,
}

impl BatchReport {
    /// `outcomes` must already be ordered by request index.
    pub fn new(
        mode: RunMode,
        outcomes: Vec<FetchOutcome>,
        total_elapsed: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(outcomes.iter().enumerate().all(|(i, o)| o.index() == i));
        Self {
            mode,
            outcomes,
            total_elapsed_nanos: u64::try_from(total_elapsed.as_nanos()).unwrap_or(u64::MAX),
            started_at,
        }
    }

    pub fn empty(mode: RunMode) -> Self {
        Self::new(mode, Vec::new(), Duration::ZERO, Utc::now())
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn total_elapsed_nanos(&self) -> u64 {
        self.total_elapsed_nanos
    }

    pub fn total_elapsed(&self) -> Duration {
        Duration::from_nanos(self.total_elapsed_nanos)
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed().as_millis() as u64
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Sum of the individual task durations (what a serial run would cost)
    pub fn task_time(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed()).sum()
    }

    /// Per-task latencies in milliseconds, in request order
    pub fn latencies_ms(&self) -> Vec<f64> {
        self.outcomes
            .iter()
            .map(|o| o.elapsed().as_secs_f64() * 1000.0)
            .collect()
    }

    pub fn into_outcomes(self) -> Vec<FetchOutcome> {
        self.outcomes
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} ok in {}ms",
            self.mode,
            self.succeeded(),
            self.len(),
            self.total_elapsed_ms()
        )
    }
}
