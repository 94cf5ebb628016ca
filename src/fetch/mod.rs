//! Fetching text content from URLs
//!
//! [`Fetcher`] is the only seam between the executors and the network. The
//! executors never talk to reqwest directly, so tests swap in scripted doubles.

mod http;
#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use http::{HttpFetcher, HttpOptions};

/// Errors produced by a single fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("fetcher panicked: {0}")]
    Panicked(String),
}

impl FetchError {
    /// Short machine-friendly name used in CSV/JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout(_) => "timeout",
            FetchError::Http { .. } => "http",
            FetchError::Body(_) => "body",
            FetchError::Panicked(_) => "panicked",
        }
    }
}

/// Blocking fetch of one URL's body as text
///
/// Implementations must be shareable across worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
