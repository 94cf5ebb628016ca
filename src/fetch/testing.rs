//! Test doubles for [`Fetcher`]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::{FetchError, Fetcher};

/// Fetcher with scripted latency, failures and panics per URL
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    default_latency: Duration,
    latencies: HashMap<String, Duration>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    bodies: HashMap<String, String>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    pub fn latency_for(mut self, url: impl Into<String>, latency: Duration) -> Self {
        self.latencies.insert(url.into(), latency);
        self
    }

    pub fn fail_on(mut self, url: impl Into<String>) -> Self {
        self.failures.insert(url.into());
        self
    }

    pub fn panic_on(mut self, url: impl Into<String>) -> Self {
        self.panics.insert(url.into());
        self
    }

    pub fn body_for(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    /// Number of fetch calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Body returned for a URL without a scripted body
    pub fn echo_body(url: &str) -> String {
        format!("<html>{url}</html>")
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = self
            .latencies
            .get(url)
            .copied()
            .unwrap_or(self.default_latency);
        if !latency.is_zero() {
            thread::sleep(latency);
        }

        if self.panics.contains(url) {
            panic!("scripted panic for {url}");
        }
        if self.failures.contains(url) {
            return Err(FetchError::Network(format!("connection refused: {url}")));
        }

        Ok(self
            .bodies
            .get(url)
            .cloned()
            .unwrap_or_else(|| Self::echo_body(url)))
    }
}

/// `count` distinct URLs of the form `https://host-<i>.test/`
pub fn urls(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("https://host-{i}.test/")).collect()
}
