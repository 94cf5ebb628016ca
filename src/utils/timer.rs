//! Wall-clock timing helpers

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Monotonic timer that also remembers the wall-clock start
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    started_at: DateTime<Utc>,
    label: &'static str,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            started_at: Utc::now(),
            label,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Stop timer and return elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::trace!("{}: {}ms", self.label, elapsed.as_millis());
        elapsed
    }
}
