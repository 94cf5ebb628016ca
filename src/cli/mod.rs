//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::benchmark::Strategy;
use crate::config::AppConfig;

/// Serial vs. bounded-parallel URL fetch timing
#[derive(Parser, Debug)]
#[command(name = "parfetch")]
#[command(version)]
#[command(about = "Fetch URLs serially and on a thread pool, and compare the timings")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch URLs and report timings (the default)
    Run(RunArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// URLs to fetch (overrides configured URLs)
    pub urls: Vec<String>,

    /// Runners to use (serial, parallel, both)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Worker threads for parallel runs
    #[arg(short, long)]
    pub pool_size: Option<usize>,

    /// Number of rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format (text, table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Suppress per-URL lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RunArgs {
    /// Layer command-line flags over the resolved configuration
    pub fn apply_to(&self, config: &mut AppConfig) -> Result<()> {
        if !self.urls.is_empty() {
            config.urls = self.urls.clone();
        }
        if let Some(mode) = &self.mode {
            config.strategy = Strategy::from_str(mode)
                .ok_or_else(|| anyhow::anyhow!("Unknown mode: {mode}"))?;
        }
        if let Some(pool_size) = self.pool_size {
            config.pool_size = pool_size;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if self.quiet {
            config.quiet = true;
        }
        config.validate()
    }
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Write an example configuration file
    Init {
        /// Destination (.yaml, .yml or .json)
        #[arg(default_value = "parfetch.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List recognised environment variables and their current values
    Env,
}
