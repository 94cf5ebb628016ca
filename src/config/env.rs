//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::benchmark::Strategy;

/// Environment variable prefix
const ENV_PREFIX: &str = "PARFETCH";

/// Overrides read from `PARFETCH_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Comma-separated URL list from PARFETCH_URLS
    pub urls: Option<Vec<String>>,
    /// Pool size from PARFETCH_POOL_SIZE
    pub pool_size: Option<usize>,
    /// Rounds from PARFETCH_ROUNDS
    pub rounds: Option<u32>,
    /// Strategy from PARFETCH_STRATEGY
    pub strategy: Option<Strategy>,
    /// Timeout from PARFETCH_TIMEOUT
    pub timeout: Option<u64>,
    /// Output format from PARFETCH_FORMAT
    pub format: Option<String>,
    /// Quiet from PARFETCH_QUIET
    pub quiet: Option<bool>,
    /// Config file from PARFETCH_CONFIG
    pub config_file: Option<String>,
    /// Log level from PARFETCH_LOG
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            urls: get_env("URLS").map(|v| split_list(&v)),
            pool_size: get_env_parse("POOL_SIZE"),
            rounds: get_env_parse("ROUNDS"),
            strategy: get_env("STRATEGY").and_then(|v| Strategy::from_str(&v)),
            timeout: get_env_parse("TIMEOUT"),
            format: get_env("FORMAT"),
            quiet: get_env_bool("QUIET"),
            config_file: get_env("CONFIG"),
            log_level: get_env("LOG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.urls.is_some()
            || self.pool_size.is_some()
            || self.rounds.is_some()
            || self.strategy.is_some()
            || self.timeout.is_some()
            || self.format.is_some()
            || self.quiet.is_some()
            || self.config_file.is_some()
            || self.log_level.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_URLS:       {:?}", ENV_PREFIX, self.urls);
        println!("  {}_POOL_SIZE:  {:?}", ENV_PREFIX, self.pool_size);
        println!("  {}_ROUNDS:     {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_STRATEGY:   {:?}", ENV_PREFIX, self.strategy);
        println!("  {}_TIMEOUT:    {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_FORMAT:     {:?}", ENV_PREFIX, self.format);
        println!("  {}_QUIET:      {:?}", ENV_PREFIX, self.quiet);
        println!("  {}_CONFIG:     {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_LOG:        {:?}", ENV_PREFIX, self.log_level);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn urls(mut self, urls: &[&str]) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_URLS"), urls.join(",")));
        self
    }

    pub fn pool_size(mut self, size: usize) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_POOL_SIZE"), size.to_string()));
        self
    }

    pub fn rounds(mut self, rounds: u32) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_ROUNDS"), rounds.to_string()));
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_STRATEGY"), strategy.to_string()));
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_QUIET"), quiet.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all PARFETCH environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_URLS        Comma-separated URLs to fetch");
    println!("  {ENV_PREFIX}_POOL_SIZE   Worker threads for parallel runs");
    println!("  {ENV_PREFIX}_ROUNDS      Number of rounds");
    println!("  {ENV_PREFIX}_STRATEGY    serial, parallel, or both");
    println!("  {ENV_PREFIX}_TIMEOUT     Per-request timeout in seconds");
    println!("  {ENV_PREFIX}_FORMAT      Output format (text, table, json, csv, summary)");
    println!("  {ENV_PREFIX}_QUIET       Suppress per-URL lines (true/false)");
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!("  {ENV_PREFIX}_LOG         Log level (trace, debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_URLS=https://www.rust-lang.org,https://crates.io");
    println!("  export {ENV_PREFIX}_POOL_SIZE=8");
    println!("  parfetch run");
}
