//! commit-clock entry point.
//!
//! Loads a sample history and answers counter/time questions against it,
//! one JSON object per line on stdout.

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clock_common::{
    load_samples, parse_timestamp, validate_sequence, ClockConfig, OutOfRangePolicy, Timestamp,
};
use clock_estimator::{resolve_window, CounterTimeEstimator, SortedSamples};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::report::{emit, CounterRecord, Coverage, LatestRecord, TimeRecord, WindowRecord};

/// Environment variable naming a configuration file.
const CONFIG_ENV: &str = "COMMIT_CLOCK_CONFIG";

/// Configuration file used during local development.
const LOCAL_CONFIG: &str = "config/commit-clock.toml";

/// commit-clock command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "commit-clock",
    about = "Estimate wall-clock times for commit counters from a sparse sample history",
    version,
    long_about = None
)]
struct Args {
    /// Path to a configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the sample file (overrides config file).
    #[arg(long, short = 's', value_name = "FILE")]
    samples: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the time of each counter.
    Estimate {
        /// Counters to estimate.
        #[arg(required = true)]
        counters: Vec<u64>,
    },
    /// Estimate the counter in effect at each time (RFC 3339).
    Counter {
        /// Times to estimate.
        #[arg(required = true, value_parser = parse_time_arg)]
        times: Vec<Timestamp>,
    },
    /// Resolve a time window into a counter window.
    Window {
        /// Window start (RFC 3339).
        #[arg(long, value_parser = parse_time_arg)]
        from: Timestamp,
        /// Window end (RFC 3339).
        #[arg(long, value_parser = parse_time_arg)]
        to: Timestamp,
        /// Leave endpoints outside the history unresolved instead of clamping.
        #[arg(long)]
        strict: bool,
    },
    /// Latest estimated time over a set of counters.
    Latest {
        /// Counters to consider.
        #[arg(required = true)]
        counters: Vec<u64>,
    },
    /// Check that the sample history strictly increases in counter and time.
    Check,
}

fn parse_time_arg(s: &str) -> Result<Timestamp, String> {
    parse_timestamp(s).map_err(|e| format!("invalid RFC 3339 time {s:?}: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting commit-clock");

    let mut config = load_config(&args)?;
    if let Some(samples) = &args.samples {
        config.samples.path = Some(samples.clone());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args.command, &config, &mut out)
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "commit_clock={},clock_estimator={},clock_common={}",
        level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `COMMIT_CLOCK_CONFIG` environment variable
/// 3. `config/commit-clock.toml` (local development)
/// 4. Built-in defaults
fn load_config(args: &Args) -> Result<ClockConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return ClockConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from {}", CONFIG_ENV);
            return ClockConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from {}={:?}", CONFIG_ENV, env_path)
            });
        }
        warn!(
            path = %env_path,
            "{} set but file does not exist, checking other locations", CONFIG_ENV
        );
    }

    let local_path = PathBuf::from(LOCAL_CONFIG);
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return ClockConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {:?}", local_path));
    }

    info!("No config file found, using built-in defaults");
    Ok(ClockConfig::default())
}

/// Load the configured sample history.
fn load_history(config: &ClockConfig) -> Result<SortedSamples> {
    let Some(path) = &config.samples.path else {
        bail!("no sample file configured; pass --samples or set [samples].path");
    };
    let samples = load_samples(path)?;
    if samples.is_empty() {
        warn!(path = %path.display(), "Sample file is empty, every estimate will be unknown");
    }
    let history = SortedSamples::new(samples);
    if !history.is_time_ordered() {
        warn!(
            "Sample times run backwards in counter order, \
             estimates across those samples will be unknown"
        );
    }
    info!(samples = history.len(), "Sample history loaded");
    Ok(history)
}

/// Execute one command against the configured history.
fn run<W: Write>(command: &Command, config: &ClockConfig, out: &mut W) -> Result<()> {
    let history = load_history(config)?;
    let estimator = CounterTimeEstimator::new(config.estimator.clone());

    match command {
        Command::Estimate { counters } => {
            for &counter in counters {
                let estimate = estimator.estimate(counter, &history)?;
                emit(out, &TimeRecord::new(counter, &estimate))?;
            }
        }
        Command::Counter { times } => {
            for &time in times {
                let estimate = estimator.estimate_counter(time, &history)?;
                emit(out, &CounterRecord::new(time, &estimate))?;
            }
        }
        Command::Window { from, to, strict } => {
            let policy = if *strict {
                OutOfRangePolicy::Strict
            } else {
                config.window.out_of_range
            };
            let window = resolve_window(&estimator, &history, *from, *to, policy)?;
            emit(out, &WindowRecord::new(*from, *to, &window))?;
        }
        Command::Latest { counters } => {
            let estimate = estimator.latest_estimate(counters.iter().copied(), &history)?;
            emit(out, &LatestRecord::new(counters.len(), &estimate))?;
        }
        Command::Check => {
            validate_sequence(history.as_slice()).context("Sample history is not monotonic")?;
            emit(out, &serde_json::json!({ "samples": history.len(), "status": "ok" }))?;
        }
    }

    let snapshot = estimator.snapshot();
    info!(
        coverage = %Coverage::from_snapshot(&snapshot),
        known = snapshot.known,
        no_data = snapshot.no_data,
        degenerate = snapshot.degenerate,
        inverted = snapshot.inverted,
        "Run complete"
    );
    Ok(())
}
