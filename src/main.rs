//! Benchmark sweep CLI.
//!
//! Runs every configured (size × threads × strategy) combination and writes
//! the semicolon-delimited report consumed by the chart tooling.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use parmul::harness::{self, SweepConfig, SystemProbe};

#[derive(Parser)]
#[command(name = "parmul")]
#[command(about = "Benchmark parallel matrix multiplication strategies", long_about = None)]
struct Args {
    /// Square matrix sizes to sweep (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "64,128,512,1024")]
    sizes: Vec<usize>,

    /// Thread counts for the partitioned strategies (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "1,2,4,8,16")]
    threads: Vec<usize>,

    /// Strategies to run (comma-separated tags; default: all)
    #[arg(long, value_delimiter = ',')]
    strategies: Option<Vec<String>>,

    /// Report output path
    #[arg(long, default_value = "results/benchmark.csv")]
    output: PathBuf,

    /// Settle pause before each memory sample, in milliseconds
    #[arg(long, default_value_t = 200)]
    settle_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parmul=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = SweepConfig::new(args.sizes, args.threads);
    if let Some(strategies) = args.strategies {
        config.strategies = strategies;
    }
    config.settle = Duration::from_millis(args.settle_ms);

    let probe = SystemProbe::new();
    info!(
        physical = probe.physical_cores(),
        logical = probe.logical_cores(),
        "detected core topology"
    );

    let samples = harness::run_sweep(&config, &probe).context("benchmark sweep failed")?;
    harness::write_report(&args.output, &samples).context("report export failed")?;

    info!(samples = samples.len(), path = %args.output.display(), "report written");
    Ok(())
}
