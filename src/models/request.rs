//! Per-URL request and outcome values

use std::time::Duration;

use crate::executor::preview;
use crate::fetch::FetchError;

/// One URL to fetch, tagged with its position in the batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    url: String,
    index: usize,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, index: usize) -> Self {
        Self {
            url: url.into(),
            index,
        }
    }

    /// Build one request per URL, indexed in input order
    pub fn batch<S: AsRef<str>>(urls: &[S]) -> Vec<FetchRequest> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| FetchRequest::new(AsRef::<str>::as_ref(url), index))
            .collect()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Result of one fetch: text or error, plus how long it took
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOutcome {
    index: usize,
    url: String,
    elapsed_nanos: u64,
    result: Result<String, FetchError>,
}

impl FetchOutcome {
    pub fn new(request: FetchRequest, elapsed: Duration, result: Result<String, FetchError>) -> Self {
        Self {
            index: request.index,
            url: request.url,
            elapsed_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            result,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn elapsed_nanos(&self) -> u64 {
        self.elapsed_nanos
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn result(&self) -> &Result<String, FetchError> {
        &self.result
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn text(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }

    /// Newline-free prefix of the body, or `None` on failure
    pub fn preview(&self) -> Option<String> {
        self.text().map(preview)
    }

    pub fn into_result(self) -> Result<String, FetchError> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let requests = FetchRequest::batch(&["https://a.test", "https://b.test", "https://a.test"]);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].index(), 0);
        assert_eq!(requests[2].index(), 2);
        assert_eq!(requests[2].url(), "https://a.test");
    }

    #[test]
    fn test_outcome_accessors() {
        let request = FetchRequest::new("https://a.test", 4);
        let outcome = FetchOutcome::new(
            request,
            Duration::from_millis(12),
            Ok("line one\nline two".to_string()),
        );

        assert_eq!(outcome.index(), 4);
        assert_eq!(outcome.elapsed_ms(), 12);
        assert_eq!(outcome.elapsed_nanos(), 12_000_000);
        assert!(outcome.is_ok());
        assert_eq!(outcome.preview().as_deref(), Some("line oneline two"));
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_failed_outcome() {
        let request = FetchRequest::new("https://down.test", 0);
        let outcome = FetchOutcome::new(
            request,
            Duration::from_millis(3),
            Err(FetchError::Network("refused".to_string())),
        );

        assert!(!outcome.is_ok());
        assert!(outcome.text().is_none());
        assert!(outcome.preview().is_none());
        assert_eq!(outcome.error().map(|e| e.kind()), Some("network"));
    }
}
