//! CLI argument parsing and command dispatch

mod duration;
mod run;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ratebench_core::{RunConfig, SelectionPolicy};
use ratebench_targets::Transport;

pub use duration::parse_duration;

#[derive(Parser, Debug)]
#[command(name = "ratebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a load test
    Run(RunArgs),
    /// Load the input and check the configuration without sending anything
    Validate(RunArgs),
}

/// Options shared by `run` and `validate`
///
/// Unset options fall back to `--config`, then to the built-in defaults.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the request list (one request per line)
    #[arg(short = 'd', long)]
    pub input: PathBuf,

    /// Target address as host:port
    #[arg(short = 's', long, default_value = "127.0.0.1:53")]
    pub server: String,

    /// Network transport (udp or tcp)
    #[arg(short = 'm', long, default_value = "udp")]
    pub transport: Transport,

    /// Timeout for one request [default: 1s]
    #[arg(short = 't', long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Total run duration [default: 10s]
    #[arg(short = 'l', long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Maximum passes over the request list, 0 for unlimited [default: 0]
    #[arg(short = 'n', long)]
    pub loops: Option<u64>,

    /// Number of concurrent workers [default: 1]
    #[arg(short = 'c', long)]
    pub workers: Option<usize>,

    /// Global requests-per-second limit [default: 1]
    #[arg(short = 'Q', long)]
    pub rate: Option<f64>,

    /// Print live stats at this interval, 0s to disable [default: 0s]
    #[arg(short = 'S', long, value_parser = parse_duration)]
    pub stats_interval: Option<Duration>,

    /// Report statistics per request key
    #[arg(short = 'p', long)]
    pub per_key: bool,

    /// Pick requests at random instead of in order
    #[arg(short = 'r', long)]
    pub shuffle: bool,

    /// Seed for --shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Feed the latency of lost requests into the latency statistics
    #[arg(long)]
    pub include_lost_latency: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// JSON run configuration used as the base for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Build the run configuration: defaults, then `--config`, then flags
    pub fn to_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str::<RunConfig>(&raw)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => RunConfig::default(),
        };

        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(loops) = self.loops {
            config.loops = loops;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(rate) = self.rate {
            config.rate_limit = rate;
        }
        if let Some(interval) = self.stats_interval {
            config.report_interval = (!interval.is_zero()).then_some(interval);
        }
        if self.per_key {
            config.per_key_stats = true;
        }
        if self.shuffle {
            config.selection = SelectionPolicy::Shuffled;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.include_lost_latency {
            config.include_lost_latency = true;
        }

        Ok(config)
    }
}

impl Cli {
    /// Dispatch the selected subcommand
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::execute_run(args).await,
            Commands::Validate(args) => run::execute_validate(args),
        }
    }
}
