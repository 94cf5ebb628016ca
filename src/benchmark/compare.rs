//! Serial vs. parallel comparison over several rounds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::LatencyStats;
use crate::executor::{ParallelRunner, PoolError, SerialRunner};
use crate::fetch::Fetcher;
use crate::models::BatchReport;

/// Which runners a comparison exercises
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Serial,
    Parallel,
    #[default]
    Both,
}

impl Strategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "serial" | "sequential" => Some(Strategy::Serial),
            "parallel" | "concurrent" => Some(Strategy::Parallel),
            "both" | "compare" => Some(Strategy::Both),
            _ => None,
        }
    }

    pub fn runs_serial(self) -> bool {
        matches!(self, Strategy::Serial | Strategy::Both)
    }

    pub fn runs_parallel(self) -> bool {
        matches!(self, Strategy::Parallel | Strategy::Both)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Serial => write!(f, "serial"),
            Strategy::Parallel => write!(f, "parallel"),
            Strategy::Both => write!(f, "both"),
        }
    }
}

/// Batches produced in one round
#[derive(Clone, Debug)]
pub struct RoundReport {
    pub round: u32,
    pub serial: Option<BatchReport>,
    pub parallel: Option<BatchReport>,
}

impl RoundReport {
    /// Serial wall time divided by parallel wall time
    pub fn speedup(&self) -> Option<f64> {
        let serial = self.serial.as_ref()?.total_elapsed().as_secs_f64();
        let parallel = self.parallel.as_ref()?.total_elapsed().as_secs_f64();
        (parallel > 0.0).then(|| serial / parallel)
    }

    pub fn batches(&self) -> impl Iterator<Item = &BatchReport> {
        self.serial.iter().chain(self.parallel.iter())
    }
}

/// All rounds of a comparison run
#[derive(Clone, Debug)]
pub struct ComparisonReport {
    pub urls: Vec<String>,
    pub pool_size: usize,
    pub strategy: Strategy,
    pub rounds: Vec<RoundReport>,
}

impl ComparisonReport {
    pub fn mean_speedup(&self) -> Option<f64> {
        let speedups: Vec<f64> = self.rounds.iter().filter_map(|r| r.speedup()).collect();
        if speedups.is_empty() {
            None
        } else {
            Some(speedups.iter().sum::<f64>() / speedups.len() as f64)
        }
    }

    pub fn batches(&self) -> impl Iterator<Item = (u32, &BatchReport)> {
        self.rounds
            .iter()
            .flat_map(|r| r.batches().map(move |b| (r.round, b)))
    }

    pub fn total_failures(&self) -> usize {
        self.batches().map(|(_, b)| b.failed()).sum()
    }

    /// Latency stats across every parallel batch
    pub fn parallel_latency(&self) -> LatencyStats {
        let samples: Vec<f64> = self
            .rounds
            .iter()
            .filter_map(|r| r.parallel.as_ref())
            .flat_map(|b| b.latencies_ms())
            .collect();
        LatencyStats::from_samples(&samples)
    }
}

/// Runs the selected strategies `rounds` times over the same URL list
#[derive(Clone, Debug)]
pub struct Comparison {
    pool_size: usize,
    rounds: u32,
    strategy: Strategy,
    quiet: bool,
}

impl Comparison {
    pub fn new(pool_size: usize, rounds: u32) -> Self {
        Self {
            pool_size,
            rounds,
            strategy: Strategy::Both,
            quiet: false,
        }
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run every round. Serial runs first in each round, as the two would
    /// otherwise compete for the network.
    pub fn run<S: AsRef<str>>(
        &self,
        fetcher: Arc<dyn Fetcher>,
        urls: &[S],
    ) -> Result<ComparisonReport, PoolError> {
        info!(
            "Comparing {} over {} URLs ({} rounds, pool size {})",
            self.strategy,
            urls.len(),
            self.rounds,
            self.pool_size
        );

        let serial = SerialRunner::new(Arc::clone(&fetcher)).quiet(self.quiet);
        let mut parallel = if self.strategy.runs_parallel() {
            Some(ParallelRunner::new(fetcher, self.pool_size)?.quiet(self.quiet))
        } else {
            None
        };

        let mut rounds = Vec::with_capacity(self.rounds as usize);
        for round in 1..=self.rounds {
            info!("=== Round {}/{} ===", round, self.rounds);

            let serial_report = self.strategy.runs_serial().then(|| serial.run(urls));
            let parallel_report = match &parallel {
                Some(runner) => Some(runner.run(urls)?),
                None => None,
            };

            let report = RoundReport {
                round,
                serial: serial_report,
                parallel: parallel_report,
            };
            if let Some(speedup) = report.speedup() {
                info!("Round {} speedup: {:.2}x", round, speedup);
            }
            rounds.push(report);
        }

        if let Some(runner) = parallel.as_mut() {
            runner.shutdown();
        }

        Ok(ComparisonReport {
            urls: urls.iter().map(|u| AsRef::<str>::as_ref(u).to_string()).collect(),
            pool_size: self.pool_size,
            strategy: self.strategy,
            rounds,
        })
    }
}
