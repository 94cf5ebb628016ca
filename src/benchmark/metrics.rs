//! Latency statistics over a batch

use serde::{Deserialize, Serialize};

use crate::models::BatchReport;

/// Latency percentiles in milliseconds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// Calculate percentiles from sorted latencies
    pub fn from_sorted(latencies: &[f64]) -> Self {
        Self {
            p50: percentile(latencies, 50.0),
            p90: percentile(latencies, 90.0),
            p95: percentile(latencies, 95.0),
            p99: percentile(latencies, 99.0),
        }
    }
}

/// Linear interpolation between the closest ranks
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let idx = (p / 100.0) * (len - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = (idx.ceil() as usize).min(len - 1);
            let fraction = idx - lower as f64;
            sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
        }
    }
}

/// Per-task latency statistics (milliseconds)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub percentiles: Percentiles,
    pub count: usize,
}

impl LatencyStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            std_dev: variance.sqrt(),
            percentiles: Percentiles::from_sorted(&sorted),
            count,
        }
    }

    /// Statistics over every task in a batch, failed ones included
    pub fn from_report(report: &BatchReport) -> Self {
        Self::from_samples(&report.latencies_ms())
    }

    pub fn format_summary(&self) -> String {
        format!(
            "min={:.1}ms p50={:.1}ms p95={:.1}ms max={:.1}ms mean={:.1}ms",
            self.min, self.percentiles.p50, self.percentiles.p95, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&sorted, 50.0), 30.0);
        assert_eq!(percentile(&sorted, 100.0), 50.0);
        assert!((percentile(&sorted, 90.0) - 46.0).abs() < 1e-9);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[7.0], 99.0), 7.0);
    }

    #[test]
    fn test_latency_stats() {
        let stats = LatencyStats::from_samples(&[30.0, 10.0, 20.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.percentiles.p50, 20.0);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(LatencyStats::from_samples(&[]), LatencyStats::default());
    }
}
