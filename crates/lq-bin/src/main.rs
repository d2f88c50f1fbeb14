//! Lacquer entrypoint: headless A/B simulation runs.

use anyhow::Result;
use clap::Parser;
use core_engine::{Comparison, Timing, WeightedColorSource};
use core_model::BufferBank;
use core_report::{ComparisonSnapshot, render_report};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lacquer", version, about = "Paint-shop conveyor sequencing simulator")]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 120)]
    ticks: u64,
    /// Seed for the weighted color stream; omitted for OS entropy.
    #[arg(long)]
    seed: Option<u64>,
    /// Configuration file path (overrides discovery of `lacquer.toml`).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit the final snapshots as JSON instead of the text report.
    #[arg(long)]
    json: bool,
    /// Conveyor log tail length included in the report.
    #[arg(long, default_value_t = 50)]
    tail: usize,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("lacquer.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "lacquer.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => core_config::load_from(path)?,
        None => core_config::discover()?,
    };
    let timing = Timing {
        base_seconds_per_body: config.timing.base_seconds_per_body,
        o1_cross_penalty: config.timing.o1_cross_penalty,
        color_change_penalty: config.timing.color_change_penalty,
    };
    let bank = BufferBank::with_capacities(config.lines.o1_capacity, config.lines.o2_capacity);

    let source = match args.seed {
        Some(seed) => WeightedColorSource::from_seed(seed),
        None => WeightedColorSource::from_entropy(),
    };

    info!(target: "runtime", ticks = args.ticks, seed = ?args.seed, "startup");
    let mut comparison = Comparison::with_config(source, timing, bank);
    comparison.run(args.ticks);

    let snapshot = ComparisonSnapshot::capture(&comparison, args.tail);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_report(&snapshot));
    }
    Ok(())
}
