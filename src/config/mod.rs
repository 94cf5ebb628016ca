//! Configuration module
//!
//! Defaults, config files, and environment overrides for a fetch run.
//! Precedence, lowest first: defaults, config file, environment, CLI flags.

mod env;
mod file;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::benchmark::Strategy;
use crate::fetch::HttpOptions;
use crate::output::OutputFormat;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::{find_config_file, resolve, ConfigSource};

/// Worker threads used by the parallel runner unless configured otherwise
pub const DEFAULT_POOL_SIZE: usize = 20;

/// Serial+parallel rounds per run
pub const DEFAULT_ROUNDS: u32 = 2;

/// URLs fetched when none are configured
pub const DEFAULT_URLS: &[&str] = &[
    "https://www.google.com",
    "https://www.github.com",
    "https://www.cvent.com",
];

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URLs to fetch, in report order
    pub urls: Vec<String>,

    /// Worker threads for parallel batches
    pub pool_size: usize,

    /// Number of rounds to run
    pub rounds: u32,

    /// Which runners to exercise
    pub strategy: Strategy,

    /// Per-request timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,

    /// User-Agent header override
    pub user_agent: Option<String>,

    /// Output format (text, table, json, json-pretty, csv, summary)
    pub format: String,

    /// Suppress per-task lines
    pub quiet: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(|u| u.to_string()).collect(),
            pool_size: DEFAULT_POOL_SIZE,
            rounds: DEFAULT_ROUNDS,
            strategy: Strategy::Both,
            timeout_secs: None,
            user_agent: None,
            format: "text".to_string(),
            quiet: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON or YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            anyhow::bail!("pool_size must be at least 1");
        }
        if self.rounds == 0 {
            anyhow::bail!("rounds must be at least 1");
        }
        if let Some(url) = self
            .urls
            .iter()
            .find(|u| !(u.starts_with("http://") || u.starts_with("https://")))
        {
            anyhow::bail!("Invalid URL '{}': expected http:// or https://", url);
        }
        self.output_format()?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format)
            .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", self.format))
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(urls) = &env.urls {
            self.urls = urls.clone();
        }
        if let Some(pool_size) = env.pool_size {
            self.pool_size = pool_size;
        }
        if let Some(rounds) = env.rounds {
            self.rounds = rounds;
        }
        if let Some(strategy) = env.strategy {
            self.strategy = strategy;
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = Some(timeout);
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(quiet) = env.quiet {
            self.quiet = quiet;
        }
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            urls: vec![
                "https://www.google.com".to_string(),
                "https://www.github.com".to_string(),
                "https://www.rust-lang.org".to_string(),
                "https://crates.io".to_string(),
            ],
            pool_size: 8,
            rounds: 3,
            timeout_secs: Some(30),
            ..Self::default()
        }
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
