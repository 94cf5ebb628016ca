//! Line-oriented progress output on stdout
//!
//! Workers print concurrently, so every line goes out as one write under the
//! stdout lock. Lines from different tasks may appear in any order.

use std::io::{self, Write};

use crate::executor::preview;
use crate::models::{BatchReport, FetchOutcome};

/// `(<ms>) <url>: <preview>` or `(<ms>) <url>: ERROR <reason>`
pub fn outcome_line(outcome: &FetchOutcome) -> String {
    match outcome.result() {
        Ok(text) => format!(
            "({}ms) {}: {}",
            outcome.elapsed_ms(),
            outcome.url(),
            preview(text)
        ),
        Err(err) => format!(
            "({}ms) {}: ERROR {}",
            outcome.elapsed_ms(),
            outcome.url(),
            err
        ),
    }
}

/// `Total time (<mode>): <ms>ms`
pub fn summary_line(report: &BatchReport) -> String {
    format!(
        "Total time ({}): {}ms",
        report.mode().name(),
        report.total_elapsed_ms()
    )
}

/// Write one line atomically. A closed stdout is ignored.
pub fn print_line(line: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{line}").and_then(|_| stdout.flush());
}
