//! Sequential batch execution

use std::sync::Arc;
use tracing::info;

use super::TimedTask;
use crate::fetch::Fetcher;
use crate::models::{BatchReport, FetchRequest, RunMode};
use crate::output::console;
use crate::utils::Timer;

/// Runs fetches one after another on the calling thread
pub struct SerialRunner {
    fetcher: Arc<dyn Fetcher>,
    echo: bool,
}

impl SerialRunner {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            echo: true,
        }
    }

    /// Suppress per-task and summary lines on stdout
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.echo = !quiet;
        self
    }

    /// Fetch every URL in order. A failed fetch does not stop the batch.
    pub fn run<S: AsRef<str>>(&self, urls: &[S]) -> BatchReport {
        info!("Fetching {} URLs serially", urls.len());

        let timer = Timer::start("serial batch");
        let outcomes = FetchRequest::batch(urls)
            .into_iter()
            .map(|request| {
                TimedTask::new(request)
                    .echo(self.echo)
                    .run(&*self.fetcher)
            })
            .collect();
        let started_at = timer.started_at();
        let elapsed = timer.stop();

        let report = BatchReport::new(RunMode::Serial, outcomes, elapsed, started_at);
        if self.echo {
            console::print_line(&console::summary_line(&report));
        }

        info!(
            "Serial batch completed in {}ms - {}/{} ok",
            report.total_elapsed_ms(),
            report.succeeded(),
            report.len()
        );
        report
    }
}

/// One-shot serial batch
pub fn run_serial<S: AsRef<str>>(fetcher: Arc<dyn Fetcher>, urls: &[S], quiet: bool) -> BatchReport {
    SerialRunner::new(fetcher).quiet(quiet).run(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{urls, ScriptedFetcher};
    use std::time::Duration;

    #[test]
    fn test_serial_preserves_order() {
        let urls = urls(6);
        let report = run_serial(Arc::new(ScriptedFetcher::new()), &urls, true);

        assert_eq!(report.len(), 6);
        assert_eq!(report.mode(), RunMode::Serial);
        for (i, outcome) in report.outcomes().iter().enumerate() {
            assert_eq!(outcome.index(), i);
            assert_eq!(outcome.url(), urls[i]);
            assert_eq!(outcome.text(), Some(ScriptedFetcher::echo_body(&urls[i]).as_str()));
        }
    }

    #[test]
    fn test_serial_continues_after_failure() {
        let urls = urls(5);
        let fetcher = ScriptedFetcher::new().fail_on(urls[1].clone());
        let report = run_serial(Arc::new(fetcher), &urls, true);

        assert_eq!(report.len(), 5);
        assert_eq!(report.failed(), 1);
        assert!(!report.outcomes()[1].is_ok());
        assert!(report.outcomes()[4].is_ok());
    }

    #[test]
    fn test_serial_total_is_sum_of_tasks() {
        let urls = urls(4);
        let fetcher = ScriptedFetcher::new().with_latency(Duration::from_millis(25));
        let report = run_serial(Arc::new(fetcher), &urls, true);

        assert!(report.total_elapsed() >= Duration::from_millis(100));
        assert!(report.total_elapsed() >= report.task_time());
    }

    #[test]
    fn test_serial_empty_input() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let runner = SerialRunner::new(fetcher.clone()).quiet(true);
        let report = runner.run::<String>(&[]);

        assert!(report.is_empty());
        assert!(report.total_elapsed() < Duration::from_millis(50));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn test_serial_fetches_duplicates_independently() {
        let urls = vec!["https://same.test/".to_string(); 3];
        let fetcher = Arc::new(ScriptedFetcher::new());
        let report = SerialRunner::new(fetcher.clone()).quiet(true).run(&urls);

        assert_eq!(report.len(), 3);
        assert_eq!(fetcher.calls(), 3);
    }
}
