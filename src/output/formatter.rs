//! Output formatters for comparison reports
//!
//! Provides text, table, JSON, CSV, and summary output formats.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::benchmark::{ComparisonReport, LatencyStats, RoundReport, Strategy};
use crate::models::{BatchReport, FetchOutcome, RunMode};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Live per-task lines plus batch totals
    Text,
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(OutputFormat::Text),
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }

    /// Whether runners should print per-task lines while working
    pub fn streams_progress(self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    index: usize,
    url: &'a str,
    elapsed_ms: u64,
    elapsed_nanos: u64,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> OutcomeRecord<'a> {
    fn new(outcome: &'a FetchOutcome) -> Self {
        Self {
            index: outcome.index(),
            url: outcome.url(),
            elapsed_ms: outcome.elapsed_ms(),
            elapsed_nanos: outcome.elapsed_nanos(),
            ok: outcome.is_ok(),
            preview: outcome.preview(),
            error_kind: outcome.error().map(|e| e.kind()),
            error: outcome.error().map(|e| e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct BatchRecord<'a> {
    round: u32,
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pool_size: Option<usize>,
    started_at: DateTime<Utc>,
    total_elapsed_ms: u64,
    total_elapsed_nanos: u64,
    succeeded: usize,
    failed: usize,
    latency: LatencyStats,
    outcomes: Vec<OutcomeRecord<'a>>,
}

impl<'a> BatchRecord<'a> {
    fn new(round: u32, report: &'a BatchReport) -> Self {
        let pool_size = match report.mode() {
            RunMode::Serial => None,
            RunMode::Parallel { pool_size } => Some(pool_size),
        };
        Self {
            round,
            mode: report.mode().name(),
            pool_size,
            started_at: report.started_at(),
            total_elapsed_ms: report.total_elapsed_ms(),
            total_elapsed_nanos: report.total_elapsed_nanos(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            latency: LatencyStats::from_report(report),
            outcomes: report.outcomes().iter().map(OutcomeRecord::new).collect(),
        }
    }
}

#[derive(Serialize)]
struct ComparisonRecord<'a> {
    urls: &'a [String],
    pool_size: usize,
    strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_speedup: Option<f64>,
    batches: Vec<BatchRecord<'a>>,
}

impl<'a> ComparisonRecord<'a> {
    fn new(report: &'a ComparisonReport) -> Self {
        Self {
            urls: &report.urls,
            pool_size: report.pool_size,
            strategy: report.strategy,
            mean_speedup: report.mean_speedup(),
            batches: report
                .batches()
                .map(|(round, batch)| BatchRecord::new(round, batch))
                .collect(),
        }
    }
}

/// Comparison report formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Render a full comparison run
    pub fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(report)),
            OutputFormat::Table => Ok(report
                .rounds
                .iter()
                .map(|round| self.format_round_table(round))
                .collect::<Vec<_>>()
                .join("")
                + &self.format_text(report)),
            OutputFormat::Json => serde_json::to_string(&ComparisonRecord::new(report))
                .context("Failed to serialize report"),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&ComparisonRecord::new(report))
                .context("Failed to serialize report"),
            OutputFormat::Csv => self.format_csv(report),
            OutputFormat::Summary => Ok(self.format_summary(report)),
        }
    }

    /// Speedup footer; per-task lines were already streamed
    fn format_text(&self, report: &ComparisonReport) -> String {
        let mut output = String::new();
        for round in &report.rounds {
            if let Some(speedup) = round.speedup() {
                output.push_str(&format!(
                    "Round {}: parallel speedup {}\n",
                    round.round,
                    self.paint_speedup(speedup)
                ));
            }
        }
        if let Some(mean) = report.mean_speedup() {
            output.push_str(&format!(
                "Mean speedup over {} rounds: {}\n",
                report.rounds.len(),
                self.paint_speedup(mean)
            ));
        }
        let failures = report.total_failures();
        if failures > 0 {
            output.push_str(&format!("{failures} fetches failed\n"));
        }
        output
    }

    fn format_round_table(&self, round: &RoundReport) -> String {
        let mut output = String::new();
        let urls = round.batches().next().map(|b| b.len()).unwrap_or(0);

        output.push_str("\n╔══════════════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  Round {:3} - {:3} URLs{:48}║\n", round.round, urls, ""));
        output.push_str("╠══════════════════════════════════════════════════════════════════════╣\n");
        output.push_str(&format!(
            "║  {:3} {:40} {:>10} {:>10}   ║\n",
            "#", "URL", "serial", "parallel"
        ));

        for index in 0..urls {
            let serial = round.serial.as_ref().map(|b| &b.outcomes()[index]);
            let parallel = round.parallel.as_ref().map(|b| &b.outcomes()[index]);
            let url = serial.or(parallel).map(|o| o.url()).unwrap_or("");

            output.push_str(&format!(
                "║  {:3} {:40} {} {}   ║\n",
                index,
                clip(url, 40),
                self.cell(serial),
                self.cell(parallel)
            ));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════════════╣\n");
        let total = |b: &Option<BatchReport>| {
            b.as_ref()
                .map(|b| format!("{}ms", b.total_elapsed_ms()))
                .unwrap_or_else(|| "-".to_string())
        };
        output.push_str(&format!(
            "║  Total: serial {:>8} | parallel {:>8} | speedup {:>7}            ║\n",
            total(&round.serial),
            total(&round.parallel),
            round
                .speedup()
                .map(|s| format!("{s:.2}x"))
                .unwrap_or_else(|| "-".to_string())
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════════════╝\n");
        output
    }

    fn cell(&self, outcome: Option<&FetchOutcome>) -> String {
        match outcome {
            None => format!("{:>10}", "-"),
            Some(o) if o.is_ok() => format!("{:>8}ms", o.elapsed_ms()),
            Some(o) => {
                let text = format!("{:>7}ms!", o.elapsed_ms());
                if self.colorize {
                    format!(" \x1b[31m{text}\x1b[0m")
                } else {
                    format!(" {text}")
                }
            }
        }
    }

    fn format_csv(&self, report: &ComparisonReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "round", "mode", "index", "url", "elapsed_ms", "status", "detail",
        ])?;

        for (round, batch) in report.batches() {
            for outcome in batch.outcomes() {
                let (status, detail) = match outcome.result() {
                    Ok(text) => ("ok", crate::executor::preview(text)),
                    Err(err) => (err.kind(), err.to_string()),
                };
                writer.write_record([
                    round.to_string(),
                    batch.mode().name().to_string(),
                    outcome.index().to_string(),
                    outcome.url().to_string(),
                    outcome.elapsed_ms().to_string(),
                    status.to_string(),
                    detail,
                ])?;
            }
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        String::from_utf8(bytes).context("CSV output is not UTF-8")
    }

    fn format_summary(&self, report: &ComparisonReport) -> String {
        let mut output = String::new();
        for (round, batch) in report.batches() {
            output.push_str(&format!("Round {round} {batch}\n"));
        }
        if let Some(mean) = report.mean_speedup() {
            output.push_str(&format!("Mean speedup: {mean:.2}x\n"));
        }
        output
    }

    fn paint_speedup(&self, speedup: f64) -> String {
        let text = format!("{speedup:.2}x");
        if !self.colorize {
            return text;
        }
        if speedup >= 1.0 {
            format!("\x1b[32m{text}\x1b[0m")
        } else {
            format!("\x1b[33m{text}\x1b[0m")
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Write the report as pretty JSON
pub fn write_report_to_file(path: impl AsRef<Path>, report: &ComparisonReport) -> Result<()> {
    let path = path.as_ref();
    let content = ResultFormatter::new(OutputFormat::JsonPretty)
        .no_color()
        .format_comparison(report)?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Comparison;
    use crate::fetch::testing::{urls, ScriptedFetcher};
    use std::sync::Arc;

    fn sample_report() -> ComparisonReport {
        let urls = urls(3);
        let fetcher = ScriptedFetcher::new()
            .body_for(urls[0].clone(), "first,\n\"quoted\" body")
            .fail_on(urls[2].clone());
        Comparison::new(3, 2)
            .quiet(true)
            .run(Arc::new(fetcher), &urls)
            .unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("unknown"), None);
        assert!(OutputFormat::Text.streams_progress());
        assert!(!OutputFormat::Json.streams_progress());
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_json_output() {
        let report = sample_report();
        let json = ResultFormatter::new(OutputFormat::Json)
            .format_comparison(&report)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["pool_size"], 3);
        assert_eq!(value["strategy"], "both");
        let batches = value["batches"].as_array().unwrap();
        assert_eq!(batches.len(), 4);
        assert_eq!(batches[0]["mode"], "serial");
        assert_eq!(batches[1]["mode"], "parallel");
        assert_eq!(batches[1]["pool_size"], 3);
        assert_eq!(batches[1]["failed"], 1);
        assert_eq!(batches[1]["outcomes"][2]["error_kind"], "network");
        assert_eq!(batches[1]["outcomes"][0]["preview"], "first,\"quoted\" body");
    }

    #[test]
    fn test_csv_output() {
        let report = sample_report();
        let csv_text = ResultFormatter::new(OutputFormat::Csv)
            .format_comparison(&report)
            .unwrap();

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 12);
        assert_eq!(&rows[0][1], "serial");
        assert_eq!(&rows[0][6], "first,\"quoted\" body");
        assert_eq!(&rows[2][5], "network");
    }

    #[test]
    fn test_table_and_summary_output() {
        let report = sample_report();

        let table = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_comparison(&report)
            .unwrap();
        assert!(table.contains("Round   1"));
        assert!(table.contains("speedup"));

        let summary = ResultFormatter::new(OutputFormat::Summary)
            .format_comparison(&report)
            .unwrap();
        assert!(summary.contains("Round 1 serial: 2/3 ok"));
        assert!(summary.contains("Round 2 parallel x3: 2/3 ok"));
    }

    #[test]
    fn test_write_report_to_file() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report_to_file(&path, &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"batches\""));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghijkl", 5), "abcd…");
    }
}
