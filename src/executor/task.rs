//! Timed execution of a single fetch

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::fetch::{FetchError, Fetcher};
use crate::models::{FetchOutcome, FetchRequest};
use crate::output::console;
use crate::utils::Timer;

/// Maximum number of characters kept in a response preview
pub const PREVIEW_CHARS: usize = 100;

/// First [`PREVIEW_CHARS`] characters of `text` with line breaks removed.
///
/// Shorter input is returned whole.
pub fn preview(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .take(PREVIEW_CHARS)
        .collect()
}

/// One fetch wrapped with timing and error capture
#[derive(Debug)]
pub struct TimedTask {
    request: FetchRequest,
    echo: bool,
}

impl TimedTask {
    pub fn new(request: FetchRequest) -> Self {
        Self {
            request,
            echo: true,
        }
    }

    /// Print the result line to stdout when the task completes
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Run the fetch. Never panics and never returns early: errors and
    /// fetcher panics both end up in the outcome.
    pub fn run<F: Fetcher + ?Sized>(self, fetcher: &F) -> FetchOutcome {
        let url = self.request.url();
        debug!(index = self.request.index(), "Fetching {}", url);

        let timer = Timer::start("fetch");
        let result = match panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(url))) {
            Ok(result) => result,
            Err(payload) => Err(FetchError::Panicked(panic_message(&*payload))),
        };
        let elapsed = timer.stop();

        if let Err(err) = &result {
            warn!(index = self.request.index(), "Fetch of {} failed: {}", url, err);
        }

        let outcome = FetchOutcome::new(self.request, elapsed, result);
        if self.echo {
            console::print_line(&console::outcome_line(&outcome));
        }
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedFetcher;
    use std::time::Duration;

    #[test]
    fn test_preview_truncates_long_text() {
        let line = "abcdefghij".repeat(5);
        let text = format!("{line}\n{line}\n{line}\n{line}\n{line}");
        assert_eq!(text.chars().count(), 254);

        let stripped: String = text.chars().filter(|c| *c != '\n').collect();
        let expected: String = stripped.chars().take(100).collect();
        assert_eq!(preview(&text), expected);
        assert_eq!(preview(&text).chars().count(), 100);
    }

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("0123456789"), "0123456789");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(150);
        assert_eq!(preview(&text).chars().count(), 100);
    }

    #[test]
    fn test_preview_strips_crlf() {
        assert_eq!(preview("a\r\nb\nc"), "abc");
    }

    #[test]
    fn test_task_success() {
        let fetcher = ScriptedFetcher::new().body_for("https://a.test", "hello\nworld");
        let outcome = TimedTask::new(FetchRequest::new("https://a.test", 3))
            .echo(false)
            .run(&fetcher);

        assert_eq!(outcome.index(), 3);
        assert_eq!(outcome.text(), Some("hello\nworld"));
        assert_eq!(outcome.preview().as_deref(), Some("helloworld"));
    }

    #[test]
    fn test_task_failure_keeps_elapsed() {
        let fetcher = ScriptedFetcher::new()
            .latency_for("https://down.test", Duration::from_millis(20))
            .fail_on("https://down.test");
        let outcome = TimedTask::new(FetchRequest::new("https://down.test", 0))
            .echo(false)
            .run(&fetcher);

        assert!(matches!(outcome.error(), Some(FetchError::Network(_))));
        assert!(outcome.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_task_captures_panic() {
        let fetcher = ScriptedFetcher::new().panic_on("https://boom.test");
        let outcome = TimedTask::new(FetchRequest::new("https://boom.test", 0))
            .echo(false)
            .run(&fetcher);

        match outcome.error() {
            Some(FetchError::Panicked(msg)) => assert!(msg.contains("https://boom.test")),
            other => panic!("Expected panic capture, got {other:?}"),
        }
    }
}
