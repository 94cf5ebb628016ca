//! parfetch - URL fetch timing tool
//!
//! ## Usage
//!
//! ```bash
//! # Serial then parallel, two rounds, over the configured URLs
//! parfetch
//!
//! # Custom URLs on a pool of 8 workers
//! parfetch run https://www.rust-lang.org https://crates.io --pool-size 8
//!
//! # Parallel only, JSON report
//! parfetch run --mode parallel --format json-pretty --output report.json
//!
//! # Configuration
//! parfetch config init parfetch.yaml
//! parfetch config show
//! parfetch config env
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use parfetch::benchmark::Comparison;
use parfetch::cli::{Args, Command, ConfigAction, RunArgs};
use parfetch::config::{self, print_env_help, AppConfig, ConfigSource, EnvConfig};
use parfetch::fetch::HttpFetcher;
use parfetch::output::{write_report_to_file, ResultFormatter};
use parfetch::utils::{init_logger, LogLevel};

fn main() {
    if let Err(err) = try_main() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        env.log_level
            .as_deref()
            .and_then(LogLevel::from_str)
            .unwrap_or(LogLevel::Warn)
    };
    init_logger(level);

    let explicit = args.config.as_deref().map(Path::new);

    match args.command {
        None => run(RunArgs::default(), explicit, &env),
        Some(Command::Run(run_args)) => run(run_args, explicit, &env),
        Some(Command::Config(config_args)) => manage_config(config_args.action, explicit, &env),
    }
}

fn run(args: RunArgs, explicit: Option<&Path>, env: &EnvConfig) -> Result<()> {
    let (mut config, source) = config::resolve(explicit, env)?;
    args.apply_to(&mut config)?;

    if let ConfigSource::File(path) = &source {
        info!("Using configuration from {}", path.display());
    }

    let format = config.output_format()?;
    let quiet = config.quiet || !format.streams_progress();
    let fetcher = Arc::new(HttpFetcher::with_options(config.http_options())?);

    let report = Comparison::new(config.pool_size, config.rounds)
        .strategy(config.strategy)
        .quiet(quiet)
        .run(fetcher, &config.urls)
        .context("Batch run failed")?;

    let mut formatter = ResultFormatter::new(format);
    if !std::io::stdout().is_terminal() {
        formatter = formatter.no_color();
    }
    let rendered = formatter.format_comparison(&report)?;
    if !rendered.is_empty() {
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
    }

    if let Some(path) = &args.output {
        write_report_to_file(path, &report)?;
        info!("Report written to {}", path);
    }

    Ok(())
}

fn manage_config(action: ConfigAction, explicit: Option<&Path>, env: &EnvConfig) -> Result<()> {
    match action {
        ConfigAction::Show { json } => {
            let (config, source) = config::resolve(explicit, env)?;
            match source {
                ConfigSource::File(path) => eprintln!("# from {}", path.display()),
                ConfigSource::Defaults => eprintln!("# built-in defaults"),
            }
            let rendered = if json {
                serde_json::to_string_pretty(&config)?
            } else {
                serde_yaml::to_string(&config)?
            };
            println!("{rendered}");
        }
        ConfigAction::Init { path, force } => {
            if Path::new(&path).exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path);
            }
            AppConfig::example().save(&path)?;
            println!("Wrote example configuration to {path}");
        }
        ConfigAction::Env => {
            env.print_summary();
            println!();
            print_env_help();
        }
    }
    Ok(())
}
