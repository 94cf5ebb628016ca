//! reqwest-backed fetcher

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::{FetchError, Fetcher};

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Options for building an [`HttpFetcher`]
#[derive(Clone, Debug, Default)]
pub struct HttpOptions {
    /// Per-request timeout. `None` means a hung request blocks its worker forever.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Fetcher performing blocking GET requests
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_secs: Option<u64>,
}

impl HttpFetcher {
    /// Create a fetcher with no timeout and the default user agent
    pub fn new() -> Result<Self> {
        Self::with_options(HttpOptions::default())
    }

    pub fn with_options(options: HttpOptions) -> Result<Self> {
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(options.timeout_secs.map(Duration::from_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout_secs: options.timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_secs.unwrap_or_default())
        } else if err.is_connect() {
            FetchError::Network(format!("connection failed: {err}"))
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
